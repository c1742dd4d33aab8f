//! # 草稿预览与导出
//!
//! 将编辑器中的草稿导出为 Markdown 或 JSON 格式的字符串。
//!
//! ## 导出策略
//! - **Markdown**：YAML front matter（元数据 + 字数统计）+ 标题 + 原始 HTML 正文
//!   （Markdown 允许内嵌 HTML，避免有损转换）
//! - **JSON**：草稿的完整结构，美化输出
//!
//! 文章列表的日期标签也在这里统一格式化。

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::article::{Article, ArticleDraft};
use crate::utils::html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
}

/// 预览页展示的数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePreview {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub featured_image_url: Option<String>,
    pub date_label: String,
    pub word_count: usize,
    pub reading_minutes: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter<'a> {
    title: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a str>,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<&'a str>,
    word_count: usize,
    reading_minutes: usize,
}

/// 日期展示格式，如 `Oct 19, 2026`
const DATE_FORMAT: &str = "%b %-d, %Y";

/// 格式化后端返回的 RFC 3339 时间；缺失时为 "Not published"，无法解析时原样返回
pub fn format_date(value: Option<&str>) -> String {
    match value {
        None | Some("") => "Not published".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// 文章列表中的一行：文章本身加上发布日期标签
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    #[serde(flatten)]
    pub article: Article,
    pub date_label: String,
}

impl ArticleListItem {
    pub fn new(article: Article) -> Self {
        let date_label = format_date(article.published_at.as_deref());
        Self {
            article,
            date_label,
        }
    }
}

/// 生成预览数据
pub fn preview(draft: &ArticleDraft, today: NaiveDate) -> ArticlePreview {
    ArticlePreview {
        title: draft.title.trim().to_string(),
        content: draft.content.clone(),
        excerpt: draft.excerpt.trim().to_string(),
        tags: draft.tags.as_slice().to_vec(),
        featured_image_url: draft.featured_image_url.clone(),
        date_label: today.format(DATE_FORMAT).to_string(),
        word_count: html::word_count(&draft.content),
        reading_minutes: html::reading_minutes(&draft.content),
    }
}

/// 导出为带 YAML front matter 的 Markdown
pub fn to_markdown(draft: &ArticleDraft) -> AppResult<String> {
    let front = FrontMatter {
        title: draft.title.trim(),
        status: draft.status.as_str(),
        category_id: draft.category_id.as_deref().filter(|c| !c.is_empty()),
        tags: draft.tags.as_slice(),
        featured_image: draft.featured_image_url.as_deref().filter(|u| !u.is_empty()),
        excerpt: Some(draft.excerpt.trim()).filter(|e| !e.is_empty()),
        word_count: html::word_count(&draft.content),
        reading_minutes: html::reading_minutes(&draft.content),
    };
    let yaml = serde_yaml::to_string(&front)
        .map_err(|e| AppError::Config(format!("生成 front matter 失败: {}", e)))?;

    let mut lines: Vec<String> = vec!["---".into(), yaml.trim_end().to_string(), "---".into()];
    lines.push(String::new());
    lines.push(format!("# {}", draft.title.trim()));
    lines.push(String::new());
    lines.push(draft.content.trim().to_string());
    lines.push(String::new());

    Ok(lines.join("\n"))
}

/// 导出为美化的 JSON
pub fn to_json(draft: &ArticleDraft) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(draft)?)
}

pub fn export(draft: &ArticleDraft, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Markdown => to_markdown(draft),
        ExportFormat::Json => to_json(draft),
    }
}
