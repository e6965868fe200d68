use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// 上课的星期
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub enum Weekday {
    #[serde(rename = "MON")]
    Mon,
    #[serde(rename = "TUE")]
    Tue,
    #[serde(rename = "WED")]
    Wed,
    #[serde(rename = "THU")]
    Thu,
    #[serde(rename = "FRI")]
    Fri,
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "SUN")]
    Sun,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
            Weekday::Sun => "SUN",
        };
        write!(f, "{s}")
    }
}

/// 每周的上课规律：星期、每天的开始时间和时长
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Recurrence {
    pub week_days: Vec<Weekday>,
    // 星期 → "HH:MM"
    pub time_per_day: BTreeMap<Weekday, String>,
    // 星期 → 分钟
    pub duration_per_day: BTreeMap<Weekday, i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    // 对外展示的班级编号
    pub class_code: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(flatten)]
    #[ts(flatten)]
    pub recurrence: Recurrence,
    pub custom_hour_price: Option<f64>,
    pub custom_teacher_salary: Option<f64>,
    pub admin_notes: Option<String>,
    pub teacher_notes: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 花名册中的学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct RosterEntry {
    pub id: i64,
    pub name: String,
}

/// 写入存储层的新班级（含花名册）
#[derive(Debug, Clone)]
pub struct NewClass {
    pub class_code: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub student_ids: Vec<i64>,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub recurrence: Recurrence,
    pub custom_hour_price: Option<f64>,
    pub custom_teacher_salary: Option<f64>,
    pub admin_notes: Option<String>,
    pub teacher_notes: Option<String>,
}
