use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::MeetingProvider;
use crate::errors::{Result, TutorHubError};

/// 基于房间名的会议链接：`{base_url}/{标题 slug}-{uuid}`
pub struct RoomLinkProvider {
    base_url: String,
}

impl RoomLinkProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(TutorHubError::meeting_provider(format!(
                "Meeting base URL must be http(s): {base_url}"
            )));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "class".to_string()
    } else {
        slug.to_string()
    }
}

#[async_trait]
impl MeetingProvider for RoomLinkProvider {
    async fn create_meeting(
        &self,
        title: &str,
        start: DateTime<Utc>,
        duration_minutes: i32,
    ) -> Result<String> {
        if duration_minutes <= 0 {
            return Err(TutorHubError::meeting_provider(
                "Meeting duration must be positive",
            ));
        }

        let link = format!(
            "{}/{}-{}",
            self.base_url,
            slugify(title),
            uuid::Uuid::new_v4().simple()
        );
        debug!(
            "Created meeting room for '{}' at {} ({} min): {}",
            title, start, duration_minutes, link
        );
        Ok(link)
    }
}
