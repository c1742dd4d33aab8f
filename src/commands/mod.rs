//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `auth` - 会话初始化、登录、注册、登出
//! - `articles` - 草稿编辑、校验、保存/提交、文章列表与删除、预览导出
//! - `media` - 封面图选择和媒体库管理
//! - `messages` - 收件箱
//! - `dashboard` - 统计概览、分析、通知计数
//! - `settings` - 应用配置读写
//!
//! 所有 command 返回 `Result<T, AppError>`，错误以 `{ kind, message, violations? }`
//! 的形式传给前端。

pub mod articles;
pub mod auth;
pub mod dashboard;
pub mod media;
pub mod messages;
pub mod settings;

use async_trait::async_trait;
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

use crate::services::confirm::Confirm;

/// 通知计数事件名
pub const COUNTS_EVENT: &str = "notifications://counts";

/// 基于原生对话框的确认实现
pub struct DialogConfirm {
    app: AppHandle,
}

impl DialogConfirm {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl Confirm for DialogConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.app
            .dialog()
            .message(message)
            .title("Confirm")
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancel)
            .show(move |accepted| {
                let _ = tx.send(accepted);
            });
        // 对话框被销毁而未回调时视为取消
        rx.await.unwrap_or(false)
    }
}
