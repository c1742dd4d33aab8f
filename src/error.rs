//! # 统一错误类型
//!
//! 所有服务层函数返回 [`AppResult`]，Tauri command 层直接把 [`AppError`]
//! 序列化给前端。前端依据 `kind` 字段决定展示方式：
//!
//! | kind | 场景 | 前端行为 |
//! |------|------|----------|
//! | `validation` | 客户端校验未通过（请求前） | 列出全部 `violations` |
//! | `network` | 传输层失败、超时 | 通用提示 |
//! | `server` | 后端返回非 2xx 且带 `message` | 原样展示 `message` |
//! | `unauthorized` | token 缺失或失效 | 清空会话并跳转登录页 |
//! | `forbidden` | 对非草稿文章的写操作 | 提示不可编辑 |
//! | `busy` | 同一操作仍在进行中 | 忽略或提示稍候 |
//! | `invalid_input` | 请求前拒绝的输入（如非图片文件） | 原样展示 |
//! | `cancelled` | 用户在确认框中取消 | 静默 |
//!
//! 任何错误都不会自动重试。

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::services::validation::Violation;

/// 服务层统一返回类型
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// 客户端校验失败，携带全部违规项（按固定顺序）
    #[error("Please fix the following issues:\n\n{}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// 网络或传输失败（连接失败、超时、读取响应体失败）
    #[error("Network error: {0}")]
    Network(String),

    /// 后端返回非 2xx，`message` 原样来自响应体
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 认证失败：token 缺失或被后端拒绝
    #[error("{0}")]
    Unauthorized(String),

    /// 客户端拒绝的越权写操作（如修改已提交审核的文章）
    #[error("{0}")]
    Forbidden(String),

    /// 同一资源上已有写请求在进行中
    #[error("{0} is already in progress")]
    Busy(String),

    /// 响应体与接口声明的结构不符
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// 请求发出前即被拒绝的输入（如上传非图片文件）
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    /// 用户在确认框中取消了破坏性操作
    #[error("Cancelled by user")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl AppError {
    /// 前端用于分支处理的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Server { .. } => "server",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Busy(_) => "busy",
            Self::Decode { .. } => "decode",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
        }
    }

    /// 是否属于认证失败（需要清空会话）：401，或后端以 403 拒绝了 token
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::Server { status: 403, .. }
        )
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("request timed out".to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// 序列化为 `{ kind, message, violations? }`，供 Tauri IPC 返回前端
impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_violations = matches!(self, Self::Validation(_));
        let mut state =
            serializer.serialize_struct("AppError", if has_violations { 3 } else { 2 })?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        if let Self::Validation(violations) = self {
            let messages: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            state.serialize_field("violations", &messages)?;
        }
        state.end()
    }
}
