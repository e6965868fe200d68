use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const SCHEDULED: &'static str = "scheduled";
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "{}", Self::SCHEDULED),
            AppointmentStatus::Completed => write!(f, "{}", Self::COMPLETED),
            AppointmentStatus::Cancelled => write!(f, "{}", Self::CANCELLED),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SCHEDULED => Ok(AppointmentStatus::Scheduled),
            Self::COMPLETED => Ok(AppointmentStatus::Completed),
            Self::CANCELLED => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Invalid appointment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct Appointment {
    pub id: i64,
    pub appointment_code: String,
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    // "HH:MM"
    pub time: String,
    // 分钟
    pub duration: i32,
    pub teacher_note: Option<String>,
    pub student_note: Option<String>,
    pub teacher_attendance: Option<bool>,
    pub student_attendance: Option<bool>,
    pub teacher_rating: Option<i32>,
    pub student_rating: Option<i32>,
    pub assignment: Option<String>,
    pub meet_link: String,
    pub status: AppointmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Appointment {
    /// 课时开始时间（按 UTC 处理）
    pub fn starts_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let time = chrono::NaiveTime::parse_from_str(&self.time, "%H:%M").ok()?;
        Some(self.date.and_time(time).and_utc())
    }
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    pub time: String,
    pub duration: i32,
    pub meet_link: String,
}

// 课时的部分更新，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct AppointmentUpdate {
    pub teacher_note: Option<String>,
    pub student_note: Option<String>,
    pub teacher_attendance: Option<bool>,
    pub student_attendance: Option<bool>,
    pub teacher_rating: Option<i32>,
    pub student_rating: Option<i32>,
    pub assignment: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.teacher_note.is_none()
            && self.student_note.is_none()
            && self.teacher_attendance.is_none()
            && self.student_attendance.is_none()
            && self.teacher_rating.is_none()
            && self.student_rating.is_none()
            && self.assignment.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<AppointmentStatus>(), Ok(status));
        }
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_starts_at() {
        let appointment = Appointment {
            id: 1,
            appointment_code: "APT-x".to_string(),
            class_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: "10:30".to_string(),
            duration: 60,
            teacher_note: None,
            student_note: None,
            teacher_attendance: None,
            student_attendance: None,
            teacher_rating: None,
            student_rating: None,
            assignment: None,
            meet_link: "https://meet.example/x".to_string(),
            status: AppointmentStatus::Scheduled,
            created_at: chrono::Utc::now(),
        };
        let start = appointment.starts_at().unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-01T10:30:00+00:00");
    }
}
