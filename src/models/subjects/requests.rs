use serde::Deserialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// 课时长度：既可以是数组，也可以是逗号分隔的文本（如 "60,90"）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub enum DurationsInput {
    List(Vec<i64>),
    Text(String),
}

/// 价格表：既可以是对象，也可以是 `"60": 40, "90": 55` 形式的文本
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub enum PricesInput {
    Map(BTreeMap<String, f64>),
    Text(String),
}

// 创建 / 更新科目请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sessions_per_week: i64,
    pub durations: Option<DurationsInput>,
    pub price_per_duration: Option<PricesInput>,
    pub is_active: Option<bool>,
}
