//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型及后端 REST 响应对应的 Rust 数据结构：
//! - `article` - 文章、草稿、标签和请求体
//! - `auth` - 用户、会话和登录/注册报文
//! - `dashboard` - 分类、趋势话题、统计、通知计数和分析结果
//! - `media` - 媒体资源和上传相关结构
//! - `message` - 站内消息
//! - `settings` - 应用配置和主题偏好

pub mod article;
pub mod auth;
pub mod dashboard;
pub mod media;
pub mod message;
pub mod settings;
