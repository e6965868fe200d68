use tracing::{error, info, warn};

use super::{AuthService, LoginOutcome};
use crate::errors::{Result, TutorHubError};
use crate::models::auth::{requests::LoginRequest, responses::LoginResponse};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

const BAD_CREDENTIALS: &str = "Username or password is incorrect";

pub async fn login(service: &AuthService, login_request: LoginRequest) -> Result<LoginOutcome> {
    // 1. 根据用户名获取用户信息
    let Some(user) = service
        .storage
        .get_user_by_username(login_request.username.trim())
        .await?
    else {
        return Err(TutorHubError::authentication(BAD_CREDENTIALS));
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        warn!("Failed login attempt for user {}", user.username);
        return Err(TutorHubError::authentication(BAD_CREDENTIALS));
    }

    // 3. 停用账号不能登录
    if !user.is_active {
        return Err(TutorHubError::authentication("Account is disabled"));
    }

    // 4. 生成令牌对
    let token_pair = user.generate_token_pair().map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        TutorHubError::authentication("Login failed, unable to generate token")
    })?;

    info!("User {} logged in successfully", user.username);

    Ok(LoginOutcome {
        response: LoginResponse {
            access_token: token_pair.access_token,
            expires_in: JwtUtils::access_token_expires_in(),
            user,
        },
        refresh_token: token_pair.refresh_token,
    })
}
