pub mod appointments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod notifications;
pub mod subjects;
pub mod users;

pub use common::{ApiResponse, AppStartTime, ErrorCode};
