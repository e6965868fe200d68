use super::entities::Weekday;
use serde::Deserialize;
use std::collections::BTreeMap;
use ts_rs::TS;

// 创建班级请求
//
// subjectId / teacherId / startDate / endDate 为必填，缺失时返回校验错误而不是反序列化错误。
// 日期接受 "YYYY-MM-DD" 或 RFC 3339 时间戳（只取日期部分）。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub student_ids: Vec<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub week_days: Vec<Weekday>,
    #[serde(default)]
    pub time_per_day: BTreeMap<Weekday, String>,
    #[serde(default)]
    pub duration_per_day: BTreeMap<Weekday, i32>,
    pub custom_hour_price: Option<f64>,
    pub custom_teacher_salary: Option<f64>,
    pub admin_notes: Option<String>,
    pub teacher_notes: Option<String>,
}
