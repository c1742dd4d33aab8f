//! # 媒体选择与媒体库
//!
//! 封面图的三种来源：
//! - 本地上传：只接受 `image/*`，非图片在发请求前被拒绝，草稿不变
//! - 媒体库选择：只列出图片；获取失败时返回空列表
//! - 直接输入 URL：trim 后写入，空串清除封面
//!
//! 后端返回的文件路径是相对路径（`/uploads/...`），写入草稿前统一解析为完整 URL。

use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::article::ArticleDraft;
use crate::models::media::{MediaAsset, MediaKind, MediaMetadata, UploadFile, UploadReport};
use crate::services::api::ApiClient;
use crate::services::confirm::{self, Confirm};
use crate::utils::html::format_file_size;

/// 把后端文件路径解析为可访问的完整 URL
///
/// - 空串 → 空串
/// - 以 `http` 开头 → 原样返回
/// - 其他 → 补全开头的 `/` 后拼接 API 基础地址
pub fn resolve_media_url(api_base: &str, file_url: &str) -> String {
    if file_url.is_empty() {
        return String::new();
    }
    if file_url.starts_with("http") {
        return file_url.to_string();
    }
    if file_url.starts_with('/') {
        format!("{}{}", api_base, file_url)
    } else {
        format!("{}/{}", api_base, file_url)
    }
}

/// 由文件名推断 MIME 类型，无法识别时为 `application/octet-stream`
pub fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// 读取本地文件，准备上传
pub async fn read_upload_file(path: &Path) -> AppResult<UploadFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::InvalidInput(format!("无效的文件路径: {}", path.display())))?;
    let bytes = tokio::fs::read(path).await?;
    Ok(UploadFile {
        mime: guess_mime(&name),
        name,
        bytes,
    })
}

/// 上传封面图并写入草稿
///
/// # 返回值
/// 写入草稿的完整 URL
pub async fn upload_featured_image(
    api: &ApiClient,
    token: &str,
    draft: &mut ArticleDraft,
    file: UploadFile,
) -> AppResult<String> {
    if !file.mime.starts_with("image/") {
        return Err(AppError::InvalidInput(
            "Please select an image file".to_string(),
        ));
    }

    let asset = api.upload_media(token, file).await?;
    let url = resolve_media_url(api.base_url(), &asset.file_url);
    draft.set_featured_image_url(Some(url.clone()));
    Ok(url)
}

/// 媒体库中的图片（供封面选择）
///
/// 获取失败时记录日志并返回空列表，编辑器照常可用。
pub async fn fetch_image_library(api: &ApiClient, token: &str) -> Vec<MediaAsset> {
    match api.list_media(token).await {
        Ok(assets) => assets
            .into_iter()
            .filter(|a| a.kind() == MediaKind::Image)
            .collect(),
        Err(e) => {
            log::warn!("加载媒体库失败: {}", e);
            Vec::new()
        }
    }
}

/// 从媒体库选择封面
pub fn select_library_image(api_base: &str, draft: &mut ArticleDraft, asset: &MediaAsset) -> String {
    let url = resolve_media_url(api_base, &asset.file_url);
    draft.set_featured_image_url(Some(url.clone()));
    url
}

/// 直接输入封面 URL（trim 后写入，空串清除）
pub fn set_featured_image_url(draft: &mut ArticleDraft, url: &str) {
    draft.set_featured_image_url(Some(url.to_string()));
}

// ======== 媒体库页面 ========

/// 媒体库条目的展示数据
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(flatten)]
    pub asset: MediaAsset,
    pub kind: MediaKind,
    /// 可直接访问的完整 URL
    pub url: String,
    /// 人类可读的文件大小
    pub size_label: String,
}

impl MediaItem {
    pub fn new(api_base: &str, asset: MediaAsset) -> Self {
        Self {
            kind: asset.kind(),
            url: resolve_media_url(api_base, &asset.file_url),
            size_label: format_file_size(asset.file_size),
            asset,
        }
    }
}

/// 媒体库列表筛选条件
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilter {
    /// `None` 表示全部类别
    #[serde(default)]
    pub kind: Option<MediaKind>,
    /// 对文件名和标题的大小写不敏感搜索
    #[serde(default)]
    pub search: String,
}

impl MediaFilter {
    pub fn matches(&self, asset: &MediaAsset) -> bool {
        if self.kind.is_some_and(|k| asset.kind() != k) {
            return false;
        }
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [asset.filename.as_deref(), asset.title.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&term))
    }
}

/// 按条件列出媒体
pub async fn list_media(
    api: &ApiClient,
    token: &str,
    filter: &MediaFilter,
) -> AppResult<Vec<MediaAsset>> {
    let assets = api.list_media(token).await?;
    Ok(assets.into_iter().filter(|a| filter.matches(a)).collect())
}

/// 逐个上传多个文件，单个失败不影响其余文件
pub async fn upload_many(api: &ApiClient, token: &str, files: Vec<UploadFile>) -> AppResult<UploadReport> {
    if files.is_empty() {
        return Err(AppError::InvalidInput(
            "Please select at least one file to upload".to_string(),
        ));
    }

    let mut report = UploadReport::default();
    for file in files {
        let name = file.name.clone();
        match api.upload_media(token, file).await {
            Ok(asset) => report.uploaded.push(asset),
            Err(e) => {
                log::warn!("上传失败 {}: {}", name, e);
                report.failures.push(format!("{}: {}", name, e));
            }
        }
    }
    log::info!(
        "批量上传完成: 成功 {}，失败 {}",
        report.uploaded.len(),
        report.failures.len()
    );
    Ok(report)
}

/// 删除媒体文件，发请求前必须经过用户确认
pub async fn delete_media(
    api: &ApiClient,
    token: &str,
    confirm: &dyn Confirm,
    id: &str,
) -> AppResult<()> {
    confirm::require(confirm, "Are you sure you want to delete this file?").await?;
    api.delete_media(token, id).await
}

/// 更新替代文本和标题
pub async fn update_metadata(
    api: &ApiClient,
    token: &str,
    id: &str,
    metadata: &MediaMetadata,
) -> AppResult<MediaAsset> {
    api.update_media(token, id, metadata).await
}
