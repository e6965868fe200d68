use tracing::info;

use super::AuthService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::users::{
    entities::{User, UserChanges},
    requests::UpdateProfileRequest,
};
use crate::services::guard::{Access, authorize};
use crate::utils::password::hash_password;
use crate::utils::validate::{parse_date, validate_password_simple};

pub async fn current_user(service: &AuthService, caller: Option<&Caller>) -> Result<User> {
    let caller = authorize(caller, Access::Authenticated)?;
    service
        .storage
        .get_user_by_id(caller.id)
        .await?
        .ok_or_else(|| TutorHubError::not_found("User not found"))
}

// 去掉首尾空白
fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

pub async fn update_profile(
    service: &AuthService,
    caller: Option<&Caller>,
    update_request: UpdateProfileRequest,
) -> Result<User> {
    let caller = authorize(caller, Access::Authenticated)?;

    let name = match update_request.name {
        Some(name) if name.trim().is_empty() => {
            return Err(TutorHubError::validation("Name cannot be empty"));
        }
        other => optional_text(other),
    };

    let date_of_birth = update_request
        .date_of_birth
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(TutorHubError::validation)?;

    let password_hash = match update_request.password.as_deref() {
        Some(password) => {
            validate_password_simple(password).map_err(TutorHubError::validation)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let changes = UserChanges {
        name,
        date_of_birth,
        nationality: optional_text(update_request.nationality),
        location: optional_text(update_request.location),
        password_hash,
        ..Default::default()
    };

    let user = service
        .storage
        .update_user(caller.id, changes)
        .await?
        .ok_or_else(|| TutorHubError::not_found("User not found"))?;

    info!("User {} updated their profile", user.username);
    Ok(user)
}
