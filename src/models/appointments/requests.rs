use super::entities::AppointmentStatus;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct CreateAppointmentRequest {
    pub class_id: Option<i64>,
    // "YYYY-MM-DD" 或 RFC 3339
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct AttendanceRequest {
    pub student_attendance: Option<bool>,
    pub teacher_attendance: Option<bool>,
}

// 课后反馈，教师端和学生端各写各的字段
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct FeedbackRequest {
    pub note: Option<String>,
    pub rating: Option<i32>,
    pub assignment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}
