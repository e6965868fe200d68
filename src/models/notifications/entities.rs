use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    UpcomingClass,
    AssignmentDue,
    ClassReminder,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::UpcomingClass => write!(f, "upcoming_class"),
            NotificationType::AssignmentDue => write!(f, "assignment_due"),
            NotificationType::ClassReminder => write!(f, "class_reminder"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming_class" => Ok(NotificationType::UpcomingClass),
            "assignment_due" => Ok(NotificationType::AssignmentDue),
            "class_reminder" => Ok(NotificationType::ClassReminder),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub scheduled_for: Option<chrono::DateTime<chrono::Utc>>,
    pub related_appointment_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub scheduled_for: Option<chrono::DateTime<chrono::Utc>>,
    pub related_appointment_id: Option<i64>,
}
