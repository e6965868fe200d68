use super::entities::Appointment;
use crate::models::notifications::entities::Notification;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/appointment.ts")]
pub struct CreatedAppointment {
    pub appointment: Appointment,
    // 本次写入的通知条数
    pub notifications_sent: usize,
    pub notifications: Vec<Notification>,
}
