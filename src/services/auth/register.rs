use tracing::info;

use super::AuthService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::users::{
    entities::{NewUser, User},
    requests::RegisterRequest,
};
use crate::services::guard::{Access, authorize};
use crate::services::users::update::validate_rate;
use crate::utils::password::hash_password;
use crate::utils::validate::{parse_date, validate_password_simple, validate_username};

pub async fn register(
    service: &AuthService,
    caller: Option<&Caller>,
    create_request: RegisterRequest,
) -> Result<User> {
    let caller = authorize(caller, Access::Admin)?;

    let username = create_request.username.trim().to_string();
    validate_username(&username).map_err(TutorHubError::validation)?;
    validate_password_simple(&create_request.password).map_err(TutorHubError::validation)?;

    let name = create_request.name.trim().to_string();
    if name.is_empty() {
        return Err(TutorHubError::validation("Name is required"));
    }

    let date_of_birth = create_request
        .date_of_birth
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_date)
        .transpose()
        .map_err(TutorHubError::validation)?;

    let new_user = NewUser {
        username,
        password_hash: hash_password(&create_request.password)?,
        role: create_request.role,
        name,
        date_of_birth,
        nationality: create_request.nationality,
        location: create_request.location,
        base_salary_per_hour: validate_rate(
            create_request.base_salary_per_hour,
            "baseSalaryPerHour",
        )?,
        base_payment_per_hour: validate_rate(
            create_request.base_payment_per_hour,
            "basePaymentPerHour",
        )?,
    };

    // 用户名重复由存储层的唯一约束报告为冲突
    let user = service.storage.create_user(new_user).await?;
    info!(
        "User {} ({}) registered by admin {}",
        user.username, user.role, caller.id
    );
    Ok(user)
}
