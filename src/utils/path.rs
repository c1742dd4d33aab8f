//! # 路径工具函数
//!
//! 应用自身的数据统一存放在用户主目录下的 `.creator-dashboard` 文件夹：
//! - `config.json` - 应用配置
//! - `session.json` - 持久化的登录 token

use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = ".creator-dashboard";

/// 获取应用数据目录的绝对路径
///
/// # 错误
/// 如果无法确定用户主目录（如无 HOME 环境变量），返回配置错误。
///
/// # 示例
/// - Windows: `C:\Users\username\.creator-dashboard`
/// - Linux/macOS: `/home/username/.creator-dashboard`
pub fn get_app_data_path() -> AppResult<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| AppError::Config("无法获取用户主目录".to_string()))?;
    Ok(home.join(APP_DIR_NAME))
}

pub fn get_config_file_path() -> AppResult<PathBuf> {
    Ok(get_app_data_path()?.join("config.json"))
}

pub fn get_session_file_path() -> AppResult<PathBuf> {
    Ok(get_app_data_path()?.join("session.json"))
}
