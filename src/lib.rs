//! # Creator Dashboard - 应用核心
//!
//! 创作者仪表盘的 Rust 端：撰写文章草稿、提交审核、管理媒体、查看消息与数据分析。
//! 后端 REST API 是外部协作方，本 crate 负责：
//! - API 客户端（信封解码、错误归类、超时）
//! - 会话上下文（token 持久化与校验）
//! - 文章提交校验门与生命周期（进行中标记）
//! - 通知计数轮询
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop` feature）
//! - `models/` - 数据模型（对应前端 TypeScript 类型和后端响应）
//! - `services/` - 核心业务逻辑
//! - `state` - Tauri managed state
//! - `utils/` - 通用工具函数
//!
//! 核心逻辑不依赖 Tauri，可在无 WebView 的环境下编译和测试；
//! 桌面外壳在 `desktop` feature 下启用。

#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(feature = "desktop")]
use std::sync::Arc;

#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};

#[cfg(feature = "desktop")]
use crate::error::AppResult;
#[cfg(feature = "desktop")]
use crate::models::dashboard::NotificationCounts;
#[cfg(feature = "desktop")]
use crate::services::{config, polling::CountsListener, session::FileTokenStore};
#[cfg(feature = "desktop")]
use crate::state::AppState;

/// 读取配置并构建应用全局状态
///
/// 通知计数每次更新都以 `notifications://counts` 事件推送给前端。
#[cfg(feature = "desktop")]
async fn build_state(app: tauri::AppHandle) -> AppResult<AppState> {
    let config_path = utils::path::get_config_file_path()?;
    let app_config = config::load_config(&config_path).await?;
    let token_store = FileTokenStore::new(utils::path::get_session_file_path()?);

    let listener: CountsListener = Arc::new(move |counts: NotificationCounts| {
        if let Err(e) = app.emit(commands::COUNTS_EVENT, counts) {
            log::warn!("推送通知计数失败: {}", e);
        }
    });

    log::info!("API 地址: {}", app_config.api_url);
    AppState::new(
        app_config,
        config_path,
        Box::new(token_store),
        Some(listener),
    )
}

// `#[cfg_attr(mobile, tauri::mobile_entry_point)]`：移动端构建时将 `run()`
// 标记为入口点；桌面端由 `main.rs` 直接调用。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册插件（日志、对话框、Opener）
/// 2. 在 `setup` 钩子中读取配置并注册 `AppState`
/// 3. 注册所有自定义 Tauri commands
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// Tauri 应用启动失败（配置缺失或窗口创建失败）时 panic。
pub fn run() {
    tauri::Builder::default()
        // 调试构建输出 Info 级别日志，发布构建只保留 Warn 以上
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(if cfg!(debug_assertions) {
                    log::LevelFilter::Info
                } else {
                    log::LevelFilter::Warn
                })
                .build(),
        )
        // 删除文章/媒体、登出前的原生确认框
        .plugin(tauri_plugin_dialog::init())
        // 在系统浏览器中打开媒体文件
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let state = tauri::async_runtime::block_on(build_state(app.handle().clone()))?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 会话
            commands::auth::init_session,
            commands::auth::get_session,
            commands::auth::login,
            commands::auth::register,
            commands::auth::logout,
            // 草稿编辑与校验
            commands::articles::new_draft,
            commands::articles::draft_from_topic,
            commands::articles::open_article,
            commands::articles::add_tag,
            commands::articles::remove_tag,
            commands::articles::set_category,
            commands::articles::validate_draft,
            commands::articles::review_checklist,
            // 文章生命周期
            commands::articles::save_draft,
            commands::articles::submit_for_review,
            commands::articles::list_articles,
            commands::articles::delete_article,
            commands::articles::list_categories,
            commands::articles::trending_topics,
            commands::articles::preview_draft,
            commands::articles::export_draft,
            // 媒体
            commands::media::upload_featured_image,
            commands::media::image_library,
            commands::media::select_library_image,
            commands::media::set_featured_image_url,
            commands::media::list_media,
            commands::media::upload_media,
            commands::media::delete_media,
            commands::media::update_media,
            commands::media::open_media,
            // 收件箱
            commands::messages::list_messages,
            commands::messages::mark_message_read,
            // 仪表盘与通知
            commands::dashboard::dashboard_stats,
            commands::dashboard::analytics_overview,
            commands::dashboard::notification_counts,
            commands::dashboard::refresh_notifications,
            commands::dashboard::start_notifications,
            commands::dashboard::stop_notifications,
            // 设置
            commands::settings::read_app_config,
            commands::settings::save_app_config,
            commands::settings::effective_theme,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
