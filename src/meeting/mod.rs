//! 会议链接服务
//!
//! 创建课时前先向会议服务申请一个可加入的链接，失败时不写入任何数据。

pub mod room;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::MeetingConfig;
use crate::errors::{Result, TutorHubError};

#[async_trait]
pub trait MeetingProvider: Send + Sync {
    /// 创建会议并返回加入链接
    async fn create_meeting(
        &self,
        title: &str,
        start: DateTime<Utc>,
        duration_minutes: i32,
    ) -> Result<String>;
}

pub fn create_meeting_provider(config: &MeetingConfig) -> Result<Arc<dyn MeetingProvider>> {
    match config.provider.as_str() {
        "room" => Ok(Arc::new(room::RoomLinkProvider::new(&config.base_url)?)),
        other => Err(TutorHubError::meeting_provider(format!(
            "Unsupported meeting provider: {other}. Supported: room"
        ))),
    }
}
