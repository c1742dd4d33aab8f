//! # 媒体资源数据模型
//!
//! 媒体文件由后端持有，客户端只缓存只读列表。

use serde::{Deserialize, Serialize};

/// 媒体类别（用于媒体库筛选）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaKind {
    /// 由 MIME 类型前缀推断类别
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::Document
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// 媒体资源
///
/// 对应后端 `GET /api/media` 列表中的条目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    /// 后端存储的相对路径，如 `/uploads/file-123.jpg`
    pub file_url: String,
    /// MIME 类型
    #[serde(default)]
    pub file_type: String,
    /// 文件大小（字节）
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub created_at: String,
    /// 后端给出的类别字段（image / video / audio / document）
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MediaAsset {
    /// 资源类别：优先使用后端的 `type` 字段，缺失或无法识别时按 MIME 推断
    pub fn kind(&self) -> MediaKind {
        self.media_type
            .as_deref()
            .and_then(MediaKind::parse)
            .unwrap_or_else(|| MediaKind::from_mime(&self.file_type))
    }
}

/// 媒体元数据更新（`PUT /api/media/:id`）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// 待上传的本地文件
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 批量上传结果
///
/// 前端据此提示 "N 个文件上传成功"，并列出失败文件及原因。
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub uploaded: Vec<MediaAsset>,
    /// 每项格式为 `文件名: 错误信息`
    pub failures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_prefers_server_type() {
        let asset: MediaAsset = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "fileUrl": "/uploads/clip.bin",
            "fileType": "application/octet-stream",
            "fileSize": 10,
            "createdAt": "2026-01-01T00:00:00Z",
            "type": "video"
        }))
        .unwrap();
        assert_eq!(asset.kind(), MediaKind::Video);
    }

    #[test]
    fn test_kind_falls_back_to_mime() {
        let asset: MediaAsset = serde_json::from_value(serde_json::json!({
            "id": "m2",
            "fileUrl": "/uploads/photo.png",
            "fileType": "image/png",
            "fileSize": 2048,
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(asset.kind(), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("audio/mpeg"), MediaKind::Audio);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Document);
    }
}
