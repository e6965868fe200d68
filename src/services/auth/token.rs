use tracing::error;

use super::AuthService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::responses::RefreshTokenResponse;
use crate::utils::jwt::JwtUtils;

pub async fn refresh(
    service: &AuthService,
    refresh_token: Option<&str>,
) -> Result<RefreshTokenResponse> {
    let refresh_token = refresh_token
        .ok_or_else(|| TutorHubError::authentication("Refresh token not provided"))?;

    let claims = JwtUtils::verify_refresh_token(refresh_token)
        .map_err(|_| TutorHubError::authentication("Invalid or expired refresh token"))?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| TutorHubError::authentication("Invalid refresh token subject"))?;

    // 用户被删除或停用后 refresh token 随之失效
    let user = service
        .storage
        .get_user_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| TutorHubError::authentication("User not found or disabled"))?;

    let access_token = JwtUtils::generate_access_token(user.id, &user.role.to_string())
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            TutorHubError::authentication("Unable to generate access token")
        })?;

    Ok(RefreshTokenResponse {
        access_token,
        expires_in: JwtUtils::access_token_expires_in(),
    })
}
