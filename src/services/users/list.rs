use super::UserService;
use crate::errors::Result;
use crate::models::auth::Caller;
use crate::models::users::{
    entities::{User, UserRole},
    requests::UserListParams,
};
use crate::services::guard::{Access, authorize};

pub async fn list_users(
    service: &UserService,
    caller: Option<&Caller>,
    query: UserListParams,
) -> Result<Vec<User>> {
    authorize(caller, Access::Admin)?;

    // 默认只列出教师和学生，管理员账号不在列表中
    let roles: &[UserRole] = match query.role {
        Some(UserRole::Admin) => return Ok(Vec::new()),
        Some(UserRole::Teacher) => &[UserRole::Teacher],
        Some(UserRole::Student) => &[UserRole::Student],
        None => &[UserRole::Teacher, UserRole::Student],
    };

    service.storage.list_users_by_roles(roles).await
}
