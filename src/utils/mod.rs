//! # 通用工具函数
//!
//! - `html` - HTML 正文的字数统计和阅读时长
//! - `path` - 应用数据目录定位

pub mod html;
pub mod path;
