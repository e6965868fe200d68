pub mod login;
pub mod profile;
pub mod register;
pub mod token;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::{
    Caller,
    requests::LoginRequest,
    responses::{LoginResponse, RefreshTokenResponse},
};
use crate::models::users::{
    entities::User,
    requests::{RegisterRequest, UpdateProfileRequest},
};
use crate::storage::Storage;

/// 登录成功后的结果，refresh token 由路由层写入 cookie
#[derive(Debug)]
pub struct LoginOutcome {
    pub response: LoginResponse,
    pub refresh_token: String,
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 用户登录
    pub async fn login(&self, login_request: LoginRequest) -> Result<LoginOutcome> {
        login::login(self, login_request).await
    }

    // 使用 refresh token 换取新的 access token
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshTokenResponse> {
        token::refresh(self, refresh_token).await
    }

    // 当前登录用户
    pub async fn current_user(&self, caller: Option<&Caller>) -> Result<User> {
        profile::current_user(self, caller).await
    }

    // 管理员创建账号
    pub async fn register(
        &self,
        caller: Option<&Caller>,
        create_request: RegisterRequest,
    ) -> Result<User> {
        register::register(self, caller, create_request).await
    }

    // 更新个人资料
    pub async fn update_profile(
        &self,
        caller: Option<&Caller>,
        update_request: UpdateProfileRequest,
    ) -> Result<User> {
        profile::update_profile(self, caller, update_request).await
    }
}
