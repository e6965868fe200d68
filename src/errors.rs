//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态映射。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tutorhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TutorHubError {
            $($variant(String),)*
        }

        impl TutorHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TutorHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TutorHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TutorHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tutorhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Conflict("E007", "Resource Conflict"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    MeetingProvider("E012", "Meeting Provider Error"),
}

impl TutorHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            TutorHubError::Validation(_) => StatusCode::BAD_REQUEST,
            TutorHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TutorHubError::Authorization(_) => StatusCode::FORBIDDEN,
            TutorHubError::NotFound(_) => StatusCode::NOT_FOUND,
            TutorHubError::Conflict(_) => StatusCode::CONFLICT,
            TutorHubError::CacheConnection(_)
            | TutorHubError::DatabaseConfig(_)
            | TutorHubError::DatabaseConnection(_)
            | TutorHubError::DatabaseOperation(_)
            | TutorHubError::Serialization(_)
            | TutorHubError::DateParse(_)
            | TutorHubError::MeetingProvider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            TutorHubError::Validation(_) => ErrorCode::BadRequest,
            TutorHubError::Authentication(_) => ErrorCode::Unauthorized,
            TutorHubError::Authorization(_) => ErrorCode::Forbidden,
            TutorHubError::NotFound(_) => ErrorCode::NotFound,
            TutorHubError::Conflict(_) => ErrorCode::Conflict,
            TutorHubError::MeetingProvider(_) => ErrorCode::MeetingCreationFailed,
            TutorHubError::CacheConnection(_)
            | TutorHubError::DatabaseConfig(_)
            | TutorHubError::DatabaseConnection(_)
            | TutorHubError::DatabaseOperation(_)
            | TutorHubError::Serialization(_)
            | TutorHubError::DateParse(_) => ErrorCode::InternalServerError,
        }
    }

    /// 返回给客户端的消息，服务端错误不暴露内部细节
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        }
    }
}

impl fmt::Display for TutorHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TutorHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TutorHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        TutorHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TutorHubError {
    fn from(err: serde_json::Error) -> Self {
        TutorHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TutorHubError {
    fn from(err: chrono::ParseError) -> Self {
        TutorHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TutorHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TutorHubError::cache_connection("test").code(), "E001");
        assert_eq!(TutorHubError::database_config("test").code(), "E002");
        assert_eq!(TutorHubError::validation("test").code(), "E005");
        assert_eq!(TutorHubError::authentication("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TutorHubError::meeting_provider("test").error_type(),
            "Meeting Provider Error"
        );
        assert_eq!(
            TutorHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TutorHubError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TutorHubError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TutorHubError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TutorHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TutorHubError::meeting_provider("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // 存储中的日期解析失败是服务端错误
        let err: TutorHubError = chrono::NaiveDate::parse_from_str("bad", "%Y-%m-%d")
            .unwrap_err()
            .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), ErrorCode::InternalServerError);
    }

    #[test]
    fn test_public_message_hides_server_details() {
        let err = TutorHubError::database_operation("UNIQUE constraint failed: users.username");
        assert_eq!(err.public_message(), "Internal server error");

        let err = TutorHubError::validation("Name is required");
        assert_eq!(err.public_message(), "Name is required");
    }

    #[test]
    fn test_format_simple() {
        let err = TutorHubError::not_found("Class 3 not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Class 3 not found"));
    }
}
