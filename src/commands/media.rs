//! # 媒体 Tauri Commands
//!
//! 编辑器封面图：
//! - `upload_featured_image` - 上传本地图片并写入草稿
//! - `image_library` / `select_library_image` - 从媒体库选择
//! - `set_featured_image_url` - 直接输入 URL
//!
//! 媒体库页面：
//! - `list_media` / `upload_media` / `delete_media` / `update_media`
//! - `open_media` - 在系统浏览器中打开文件

use std::path::PathBuf;

use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use crate::commands::DialogConfirm;
use crate::error::AppError;
use crate::models::article::ArticleDraft;
use crate::models::media::{MediaAsset, MediaMetadata, UploadReport};
use crate::services::media::{self, MediaFilter, MediaItem};
use crate::state::AppState;

#[tauri::command]
pub async fn upload_featured_image(
    mut draft: ArticleDraft,
    file_path: String,
    state: State<'_, AppState>,
) -> Result<ArticleDraft, AppError> {
    let token = state.token()?;
    let file = media::read_upload_file(&PathBuf::from(file_path)).await?;
    let result = media::upload_featured_image(&state.api()?, &token, &mut draft, file).await;
    state.guard(result).await?;
    Ok(draft)
}

/// 媒体库中的图片，加载失败时为空列表
#[tauri::command]
pub async fn image_library(state: State<'_, AppState>) -> Result<Vec<MediaItem>, AppError> {
    let token = state.token()?;
    let api = state.api()?;
    Ok(media::fetch_image_library(&api, &token)
        .await
        .into_iter()
        .map(|asset| MediaItem::new(api.base_url(), asset))
        .collect())
}

#[tauri::command]
pub fn select_library_image(
    mut draft: ArticleDraft,
    asset: MediaAsset,
    state: State<'_, AppState>,
) -> Result<ArticleDraft, AppError> {
    media::select_library_image(state.api()?.base_url(), &mut draft, &asset);
    Ok(draft)
}

#[tauri::command]
pub fn set_featured_image_url(mut draft: ArticleDraft, url: String) -> ArticleDraft {
    media::set_featured_image_url(&mut draft, &url);
    draft
}

#[tauri::command]
pub async fn list_media(
    filter: Option<MediaFilter>,
    state: State<'_, AppState>,
) -> Result<Vec<MediaItem>, AppError> {
    let token = state.token()?;
    let api = state.api()?;
    let filter = filter.unwrap_or_default();
    let assets = state.guard(media::list_media(&api, &token, &filter).await).await?;
    Ok(assets
        .into_iter()
        .map(|asset| MediaItem::new(api.base_url(), asset))
        .collect())
}

/// 批量上传本地文件，逐个报告失败
#[tauri::command]
pub async fn upload_media(
    file_paths: Vec<String>,
    state: State<'_, AppState>,
) -> Result<UploadReport, AppError> {
    let token = state.token()?;

    let mut files = Vec::with_capacity(file_paths.len());
    for path in file_paths {
        files.push(media::read_upload_file(&PathBuf::from(path)).await?);
    }

    let result = media::upload_many(&state.api()?, &token, files).await;
    state.guard(result).await
}

#[tauri::command]
pub async fn delete_media(
    id: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<(), AppError> {
    let token = state.token()?;
    let confirm = DialogConfirm::new(app);
    let result = media::delete_media(&state.api()?, &token, &confirm, &id).await;
    state.guard(result).await
}

#[tauri::command]
pub async fn update_media(
    id: String,
    metadata: MediaMetadata,
    state: State<'_, AppState>,
) -> Result<MediaItem, AppError> {
    let token = state.token()?;
    let api = state.api()?;
    let result = media::update_metadata(&api, &token, &id, &metadata).await;
    let asset = state.guard(result).await?;
    Ok(MediaItem::new(api.base_url(), asset))
}

/// 在系统浏览器中打开媒体文件
#[tauri::command]
pub fn open_media(
    file_url: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<(), AppError> {
    let url = media::resolve_media_url(state.api()?.base_url(), &file_url);
    if url.is_empty() {
        return Err(AppError::InvalidInput("No file to open".to_string()));
    }
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))
}
