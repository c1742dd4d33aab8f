//! # 站内消息数据模型
//!
//! 消息由管理员发送给创作者。`isRead` 只会经由 "标记已读" 从 false 变为 true。

use serde::{Deserialize, Serialize};

/// 消息发送者
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSender {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MessageSender {
    /// 展示名：优先用户名，其次邮箱，都没有时为 "Admin"
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Admin")
    }
}

/// 站内消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<MessageSender>,
}

/// `GET /api/messages/unread-count` 的响应
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}
