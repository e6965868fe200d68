//! 服务层测试公共夹具

use std::sync::Arc;

use crate::errors::{Result, TutorHubError};
use crate::meeting::MeetingProvider;
use crate::meeting::room::RoomLinkProvider;
use crate::models::auth::Caller;
use crate::models::users::entities::{NewUser, UserRole};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

pub async fn storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await)
}

pub fn meetings() -> Arc<dyn MeetingProvider> {
    Arc::new(RoomLinkProvider::new("https://meet.example").unwrap())
}

/// 总是失败的会议服务
pub struct FailingMeetings;

#[async_trait::async_trait]
impl MeetingProvider for FailingMeetings {
    async fn create_meeting(
        &self,
        _title: &str,
        _start: chrono::DateTime<chrono::Utc>,
        _duration_minutes: i32,
    ) -> Result<String> {
        Err(TutorHubError::meeting_provider("meeting service unavailable"))
    }
}

/// 直接写库创建用户，跳过密码哈希
pub async fn user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> Caller {
    let user = storage
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: "x".to_string(),
            role,
            name: username.to_uppercase(),
            date_of_birth: None,
            nationality: None,
            location: None,
            base_salary_per_hour: None,
            base_payment_per_hour: None,
        })
        .await
        .unwrap();
    Caller::from(&user)
}
