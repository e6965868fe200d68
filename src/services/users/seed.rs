use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::Result;
use crate::models::users::entities::{NewUser, User, UserRole};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;

const ADMIN_USERNAME: &str = "admin";

/// 用户表为空时创建初始管理员
///
/// 密码取自 `ADMIN_PASSWORD` 环境变量，未设置时随机生成并只在日志中输出一次。
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<Option<User>> {
    seed_admin_with(storage, std::env::var("ADMIN_PASSWORD").ok()).await
}

pub(crate) async fn seed_admin_with(
    storage: &Arc<dyn Storage>,
    password: Option<String>,
) -> Result<Option<User>> {
    if storage.count_users().await? > 0 {
        return Ok(None);
    }

    let (password, generated) = match password.filter(|p| !p.is_empty()) {
        Some(password) => (password, false),
        None => (generate_random_code(16), true),
    };

    let admin = storage
        .create_user(NewUser {
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(&password)?,
            role: UserRole::Admin,
            name: "Administrator".to_string(),
            date_of_birth: None,
            nationality: None,
            location: None,
            base_salary_per_hour: None,
            base_payment_per_hour: None,
        })
        .await?;

    if generated {
        warn!(
            "Created initial admin account '{}' with generated password: {}",
            ADMIN_USERNAME, password
        );
    } else {
        info!("Created initial admin account '{}'", ADMIN_USERNAME);
    }
    Ok(Some(admin))
}
