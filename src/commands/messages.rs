//! # 收件箱 Tauri Commands
//!
//! - `list_messages` - 刷新消息列表（失败时返回上次的列表和错误提示）
//! - `mark_message_read` - 标记已读并立即刷新通知计数

use tauri::State;

use crate::error::AppError;
use crate::services::inbox::InboxView;
use crate::state::AppState;

#[tauri::command]
pub async fn list_messages(state: State<'_, AppState>) -> Result<InboxView, AppError> {
    let token = state.token()?;
    let result = state.inbox.refresh(&state.api()?, &token).await;
    state.guard(result).await
}

#[tauri::command]
pub async fn mark_message_read(
    id: String,
    state: State<'_, AppState>,
) -> Result<InboxView, AppError> {
    let token = state.token()?;
    let result = state
        .inbox
        .mark_read(&state.api()?, &token, &state.poller, &id)
        .await;
    state.guard(result).await
}
