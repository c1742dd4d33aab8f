//! # 设置 Tauri Commands
//!
//! - `read_app_config` - 当前生效的配置（已应用环境变量覆盖）
//! - `save_app_config` - 保存配置到 `~/.creator-dashboard/config.json`
//!   并立即生效（重建 API 客户端，必要时按新周期重启轮询）
//! - `effective_theme` - 按系统深色模式解析实际生效的主题

use tauri::State;

use crate::error::AppError;
use crate::models::settings::{AppConfig, Theme};
use crate::state::AppState;

#[tauri::command]
pub fn read_app_config(state: State<'_, AppState>) -> AppConfig {
    state.config()
}

#[tauri::command]
pub async fn save_app_config(
    config: AppConfig,
    state: State<'_, AppState>,
) -> Result<AppConfig, AppError> {
    state.update_config(config).await
}

/// 前端传入系统是否为深色模式（`prefers-color-scheme`），返回 `Light` 或 `Dark`
#[tauri::command]
pub fn effective_theme(system_prefers_dark: bool, state: State<'_, AppState>) -> Theme {
    state.config().theme.resolve(system_prefers_dark)
}
