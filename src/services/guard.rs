//! 权限判定
//!
//! 所有服务在入口处调用 [`authorize`]，不依赖 HTTP 中间件也能保证权限正确。

use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 任意已登录用户
    Authenticated,
    /// 仅管理员
    Admin,
}

pub fn authorize(caller: Option<&Caller>, access: Access) -> Result<&Caller> {
    let caller =
        caller.ok_or_else(|| TutorHubError::authentication("Authentication required"))?;

    match (access, caller.role) {
        (Access::Authenticated, _) | (Access::Admin, UserRole::Admin) => Ok(caller),
        (Access::Admin, UserRole::Teacher | UserRole::Student) => Err(
            TutorHubError::authorization("Only administrators can perform this operation"),
        ),
    }
}
