use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub sessions_per_week: i32,
    // 可选课时长度（分钟）
    pub durations: Vec<i32>,
    // 课时长度标签 → 价格
    pub price_per_duration: BTreeMap<String, f64>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 经过解析和校验的科目字段，创建与整体更新共用
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFields {
    pub name: String,
    pub sessions_per_week: i32,
    pub durations: Vec<i32>,
    pub price_per_duration: BTreeMap<String, f64>,
    pub is_active: bool,
}
