//! # 会话 Tauri Commands
//!
//! - `init_session` - 启动时用已保存的 token 恢复会话，成功后开始通知轮询
//! - `get_session` - 当前会话状态
//! - `login` / `register` / `logout`

use tauri::{AppHandle, State};

use crate::commands::DialogConfirm;
use crate::error::AppError;
use crate::models::auth::{RegisterResponse, User};
use crate::services::confirm;
use crate::services::session::SessionStatus;
use crate::state::AppState;

/// 恢复会话
///
/// 前端在应用启动时调用一次；返回 `ready` 时仪表盘挂载，通知轮询随之启动。
#[tauri::command]
pub async fn init_session(state: State<'_, AppState>) -> Result<SessionStatus, AppError> {
    let status = state.session.init(&state.api()?).await;
    if matches!(status, SessionStatus::Ready { .. }) {
        state.start_polling()?;
    }
    Ok(status)
}

#[tauri::command]
pub fn get_session(state: State<'_, AppState>) -> SessionStatus {
    state.session.status()
}

#[tauri::command]
pub async fn login(
    email: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<User, AppError> {
    let user = state
        .session
        .login(&state.api()?, email.trim(), &password)
        .await?;
    state.start_polling()?;
    Ok(user)
}

/// 注册不返回 token，账号需管理员审核后才能登录
#[tauri::command]
pub async fn register(
    email: String,
    username: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<RegisterResponse, AppError> {
    state
        .api()?
        .register(email.trim(), username.trim(), &password)
        .await
}

/// 登出（需确认）：停止轮询、清除 token 和缓存
#[tauri::command]
pub async fn logout(app: AppHandle, state: State<'_, AppState>) -> Result<(), AppError> {
    confirm::require(
        &DialogConfirm::new(app),
        "Are you sure you want to log out?",
    )
    .await?;
    state.end_session().await;
    log::info!("用户已登出");
    Ok(())
}
