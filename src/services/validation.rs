//! # 文章提交校验（Gate）
//!
//! 决定一篇草稿能否进入目标状态，并给出全部阻塞原因。
//!
//! ## 两套校验档位
//! | 目标 | 检查项 |
//! |------|--------|
//! | `Draft` | 标题非空、正文非空 |
//! | `PendingReview` | 标题 ≥ 5 字、正文 ≥ 100 字、已选分类、已设封面、摘要 ≥ 50 字、至少一个标签 |
//!
//! 提交审核时六项检查按固定顺序全部执行，不短路；返回空列表当且仅当允许转换。
//! 校验是纯函数，不修改草稿。长度按 Unicode 标量值计数（trim 之后）。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::article::{ArticleDraft, ArticleStatus};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_CONTENT_CHARS: usize = 100;
pub const MIN_EXCERPT_CHARS: usize = 50;

/// 客户端可以发起的目标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTarget {
    Draft,
    PendingReview,
}

impl SubmitTarget {
    pub fn status(self) -> ArticleStatus {
        match self {
            Self::Draft => ArticleStatus::Draft,
            Self::PendingReview => ArticleStatus::PendingReview,
        }
    }
}

/// 单条校验违规
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    TitleRequired,
    ContentRequired,
    TitleTooShort,
    ContentTooShort,
    CategoryMissing,
    FeaturedImageMissing,
    ExcerptTooShort,
    TagsMissing,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TitleRequired => "Title is required",
            Self::ContentRequired => "Content is required",
            Self::TitleTooShort => "Title must be at least 5 characters long",
            Self::ContentTooShort => "Content must be at least 100 characters long",
            Self::CategoryMissing => "Please select a category",
            Self::FeaturedImageMissing => "Featured image is required",
            Self::ExcerptTooShort => "Meta description must be at least 50 characters long",
            Self::TagsMissing => "Please add at least one tag",
        };
        f.write_str(text)
    }
}

/// 审核要求清单中的一项（编辑器侧栏逐项打勾）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub label: &'static str,
    pub satisfied: bool,
}

type Check = fn(&ArticleDraft) -> bool;

/// 提交审核的检查表：(违规项, 清单标签, 检查函数)，顺序即报告顺序
const REVIEW_CHECKS: [(Violation, &str, Check); 6] = [
    (
        Violation::TitleTooShort,
        "Title (at least 5 characters)",
        |d| trimmed_len(&d.title) >= MIN_TITLE_CHARS,
    ),
    (
        Violation::ContentTooShort,
        "Content (at least 100 characters)",
        |d| trimmed_len(&d.content) >= MIN_CONTENT_CHARS,
    ),
    (
        Violation::CategoryMissing,
        "Category selected",
        |d| is_present(&d.category_id),
    ),
    (
        Violation::FeaturedImageMissing,
        "Featured image added",
        |d| is_present(&d.featured_image_url),
    ),
    (
        Violation::ExcerptTooShort,
        "Meta description (at least 50 characters)",
        |d| trimmed_len(&d.excerpt) >= MIN_EXCERPT_CHARS,
    ),
    (
        Violation::TagsMissing,
        "At least one tag",
        |d| !d.tags.is_empty(),
    ),
];

fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// 校验草稿能否进入目标状态
///
/// # 返回值
/// 按固定顺序排列的违规列表；为空表示允许转换
pub fn validate(draft: &ArticleDraft, target: SubmitTarget) -> Vec<Violation> {
    match target {
        SubmitTarget::Draft => {
            let mut violations = Vec::new();
            if draft.title.trim().is_empty() {
                violations.push(Violation::TitleRequired);
            }
            if draft.content.trim().is_empty() {
                violations.push(Violation::ContentRequired);
            }
            violations
        }
        SubmitTarget::PendingReview => REVIEW_CHECKS
            .iter()
            .filter(|(_, _, check)| !check(draft))
            .map(|(violation, _, _)| *violation)
            .collect(),
    }
}

/// 提交审核的要求清单（每项是否已满足）
pub fn review_checklist(draft: &ArticleDraft) -> Vec<Requirement> {
    REVIEW_CHECKS
        .iter()
        .map(|(_, label, check)| Requirement {
            label: *label,
            satisfied: check(draft),
        })
        .collect()
}
