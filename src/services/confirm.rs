//! # 破坏性操作确认
//!
//! 删除文章、删除媒体前必须经过用户确认。桌面端由原生对话框实现，
//! 测试中使用固定应答。

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

#[async_trait]
pub trait Confirm: Send + Sync {
    /// 向用户展示确认信息，返回是否同意继续
    async fn confirm(&self, message: &str) -> bool;
}

/// 固定应答（非交互环境和测试）
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// 请求确认，用户拒绝时返回 `Cancelled`
pub async fn require(confirm: &dyn Confirm, message: &str) -> AppResult<()> {
    if confirm.confirm(message).await {
        Ok(())
    } else {
        log::info!("用户取消操作: {}", message);
        Err(AppError::Cancelled)
    }
}
