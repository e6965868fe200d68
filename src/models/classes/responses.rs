use super::entities::{Class, RosterEntry};
use crate::models::appointments::entities::Appointment;
use serde::Serialize;
use ts_rs::TS;

// 班级展示视图：列表与详情共用，管理员视图与详情会带上花名册和课时
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<RosterEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<Appointment>>,
}
