//! 配置管理
//!
//! 配置文件 → 环境配置文件 → 环境变量，逐层覆盖；所有字段都有默认值。

mod r#impl;
mod structs;

pub use structs::*;
