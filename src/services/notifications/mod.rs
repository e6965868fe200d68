use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TutorHubError};
use crate::models::appointments::entities::Appointment;
use crate::models::auth::Caller;
use crate::models::notifications::{
    entities::{NewNotification, Notification, NotificationType},
    responses::{MarkAllReadResponse, UnreadCountResponse},
};
use crate::services::guard::{Access, authorize};
use crate::storage::Storage;

/// 新课时的通知：每个接收者一条，重复的接收者只通知一次
pub fn notify_appointment_created(
    appointment: &Appointment,
    recipients: &[i64],
) -> Vec<NewNotification> {
    let mut seen = Vec::with_capacity(recipients.len());
    for &user_id in recipients {
        if !seen.contains(&user_id) {
            seen.push(user_id);
        }
    }

    let message = format!(
        "A new class has been scheduled on {} at {}.",
        appointment.date.format("%Y-%m-%d"),
        appointment.time
    );

    seen.into_iter()
        .map(|user_id| NewNotification {
            user_id,
            notification_type: NotificationType::UpcomingClass,
            title: "New class scheduled".to_string(),
            message: message.clone(),
            scheduled_for: appointment.starts_at(),
            related_appointment_id: Some(appointment.id),
        })
        .collect()
}

pub struct NotificationService {
    storage: Arc<dyn Storage>,
}

impl NotificationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 当前用户的通知，最新的在前
    pub async fn list_notifications(&self, caller: Option<&Caller>) -> Result<Vec<Notification>> {
        let caller = authorize(caller, Access::Authenticated)?;
        self.storage.list_notifications(caller.id).await
    }

    pub async fn mark_read(&self, caller: Option<&Caller>, id: i64) -> Result<Notification> {
        let caller = authorize(caller, Access::Authenticated)?;
        self.storage
            .mark_notification_read(id, caller.id)
            .await?
            .ok_or_else(|| TutorHubError::not_found(format!("Notification {id} not found")))
    }

    pub async fn unread_count(&self, caller: Option<&Caller>) -> Result<UnreadCountResponse> {
        let caller = authorize(caller, Access::Authenticated)?;
        let unread_count = self.storage.count_unread_notifications(caller.id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    pub async fn mark_all_read(&self, caller: Option<&Caller>) -> Result<MarkAllReadResponse> {
        let caller = authorize(caller, Access::Authenticated)?;
        let updated = self.storage.mark_all_notifications_read(caller.id).await?;
        info!("User {} marked {} notifications as read", caller.id, updated);
        Ok(MarkAllReadResponse { updated })
    }
}
