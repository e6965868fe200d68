use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 注册请求（管理员创建教师 / 学生账号）
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    pub name: String,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub location: Option<String>,
    pub base_salary_per_hour: Option<f64>,
    pub base_payment_per_hour: Option<f64>,
}

// 用户列表查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    pub role: Option<UserRole>,
}

// 管理员更新用户
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub base_salary_per_hour: Option<f64>,
    pub base_payment_per_hour: Option<f64>,
    pub is_active: Option<bool>,
}

// 记录一笔缴费 / 结算
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RecordPaymentRequest {
    pub amount: f64,
    pub note: Option<String>,
}

// 用户更新自己的资料
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub location: Option<String>,
    pub password: Option<String>,
}
