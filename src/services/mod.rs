//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `api` - 后端 REST API 客户端（信封解码、错误归类）
//! - `session` - 会话上下文与 token 持久化
//! - `validation` - 文章提交校验（草稿档位 / 审核档位）
//! - `lifecycle` - 保存草稿、提交审核、删除文章，进行中标记
//! - `media` - 封面图选择、媒体库筛选、批量上传
//! - `polling` - 通知计数轮询
//! - `inbox` - 消息收件箱
//! - `analytics` - 分析页面的聚合计算
//! - `search` - 文章和话题的并行搜索
//! - `export` - 草稿预览与 Markdown/JSON 导出
//! - `cache` - 内存缓存（分类 TTL 缓存、文章 LRU 缓存）
//! - `config` - 应用配置读写
//! - `confirm` - 破坏性操作的确认

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod confirm;
pub mod export;
pub mod inbox;
pub mod lifecycle;
pub mod media;
pub mod polling;
pub mod search;
pub mod session;
pub mod validation;
