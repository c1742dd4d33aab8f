//! # 文章数据模型
//!
//! - `ArticleStatus` - 文章状态（草稿 / 待审核 / 已发布 / 已拒绝）
//! - `TagList` - 有序去重的标签集合
//! - `ArticleDraft` - 编辑器中的草稿（仅存在于内存，保存前不落盘）
//! - `Article` - 后端返回的文章
//! - `ArticlePayload` - 创建/更新文章时发送给后端的请求体
//!
//! 所有结构体在 IPC 与 REST 上均使用 camelCase 字段名。

use serde::{Deserialize, Serialize};

use crate::models::dashboard::TrendingTopic;

/// 文章状态
///
/// 客户端只能发起 `Draft → PendingReview` 的转换；
/// `Published` / `Rejected` 由后端审核流程决定，对客户端只读。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[default]
    Draft,
    PendingReview,
    Published,
    Rejected,
}

impl ArticleStatus {
    /// 全部状态，按分析页面的展示顺序排列
    pub const ALL: [ArticleStatus; 4] = [
        ArticleStatus::Published,
        ArticleStatus::PendingReview,
        ArticleStatus::Draft,
        ArticleStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }

    /// 客户端是否仍可修改该状态下的文章
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

/// 有序去重的标签集合
///
/// 序列化为普通字符串数组。插入时先 trim，空串或已存在的标签（大小写敏感）被忽略；
/// 按索引删除不会打乱其余标签的顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagList(Vec<String>);

impl TagList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 添加标签，返回是否真正插入
    pub fn add(&mut self, candidate: &str) -> bool {
        let tag = candidate.trim();
        if tag.is_empty() || self.0.iter().any(|t| t == tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// 按索引删除标签，索引越界时不做任何事
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        tags.iter().collect()
    }
}

impl From<TagList> for Vec<String> {
    fn from(tags: TagList) -> Self {
        tags.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = TagList::new();
        for tag in iter {
            tags.add(tag.as_ref());
        }
        tags
    }
}

/// 编辑器中的文章草稿
///
/// 新建时为空草稿，编辑时由 [`ArticleDraft::from_article`] 回填。
/// 草稿只在内存中存在，离开编辑页且未保存即丢弃。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    /// 已保存过的文章 ID；新草稿为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// HTML 格式的正文（由富文本编辑器产出）
    #[serde(default)]
    pub content: String,
    /// 摘要，前端显示为 "Meta description"
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl ArticleDraft {
    /// 新建空草稿
    pub fn new() -> Self {
        Self::default()
    }

    /// 从趋势话题预填草稿：标题取话题标题，正文为包裹在 `<p>` 中的话题描述
    pub fn from_topic(topic: &TrendingTopic) -> Self {
        let content = if topic.description.is_empty() {
            String::new()
        } else {
            format!("<p>{}</p>", escape_html(&topic.description))
        };
        Self {
            title: topic.title.clone(),
            content,
            ..Self::default()
        }
    }

    /// 用后端返回的文章回填草稿（编辑已有文章）
    pub fn from_article(article: &Article) -> Self {
        Self {
            id: Some(article.id.clone()),
            title: article.title.clone(),
            content: article.content.clone(),
            excerpt: article.excerpt.clone().unwrap_or_default(),
            category_id: non_empty(article.category_id.clone()),
            tags: article.tags.iter().collect(),
            featured_image_url: non_empty(article.featured_image_url.clone()),
            status: article.status,
        }
    }

    /// 设置分类，空字符串视为未选择
    pub fn set_category(&mut self, category_id: Option<String>) {
        self.category_id = non_empty(category_id);
    }

    /// 设置封面图 URL，空字符串视为清除
    pub fn set_featured_image_url(&mut self, url: Option<String>) {
        self.featured_image_url = non_empty(url.map(|u| u.trim().to_string()));
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 后端返回的文章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub shares_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// 创建/更新文章的请求体
///
/// `title` / `content` / `excerpt` 已 trim；空的分类和封面图以 `null` 发送。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub featured_image_url: Option<String>,
    pub status: ArticleStatus,
}

impl ArticlePayload {
    pub fn from_draft(draft: &ArticleDraft, status: ArticleStatus) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            excerpt: draft.excerpt.trim().to_string(),
            category_id: non_empty(draft.category_id.clone()),
            tags: draft.tags.as_slice().to_vec(),
            featured_image_url: non_empty(draft.featured_image_url.clone()),
            status,
        }
    }
}
