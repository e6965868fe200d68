use tracing::info;

use super::UserService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::users::{
    entities::{User, UserChanges},
    requests::UpdateUserRequest,
};
use crate::services::guard::{Access, authorize};

pub(crate) fn validate_rate(rate: Option<f64>, field: &str) -> Result<Option<f64>> {
    match rate {
        Some(value) if !value.is_finite() || value < 0.0 => Err(TutorHubError::validation(
            format!("{field} must be a non-negative number"),
        )),
        other => Ok(other),
    }
}

pub async fn update_user(
    service: &UserService,
    caller: Option<&Caller>,
    user_id: i64,
    update_data: UpdateUserRequest,
) -> Result<User> {
    let caller = authorize(caller, Access::Admin)?;

    let name = match update_data.name {
        Some(name) if name.trim().is_empty() => {
            return Err(TutorHubError::validation("Name cannot be empty"));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    // 管理员不能停用自己
    if caller.id == user_id && update_data.is_active == Some(false) {
        return Err(TutorHubError::validation("You cannot deactivate your own account"));
    }

    let changes = UserChanges {
        name,
        base_salary_per_hour: validate_rate(update_data.base_salary_per_hour, "baseSalaryPerHour")?,
        base_payment_per_hour: validate_rate(
            update_data.base_payment_per_hour,
            "basePaymentPerHour",
        )?,
        is_active: update_data.is_active,
        ..Default::default()
    };

    let user = service
        .storage
        .update_user(user_id, changes)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("User {user_id} not found")))?;

    info!("User {} updated by admin {}", user.username, caller.id);
    Ok(user)
}
