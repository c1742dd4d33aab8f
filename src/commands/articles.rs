//! # 文章 Tauri Commands
//!
//! 草稿只存在于前端内存中，每个编辑操作都把当前草稿传入、返回新的草稿：
//! - `new_draft` / `draft_from_topic` / `open_article` - 创建或回填草稿
//! - `add_tag` / `remove_tag` / `set_category` - 字段编辑
//! - `validate_draft` / `review_checklist` - 校验门
//! - `save_draft` / `submit_for_review` - 持久化
//! - `list_articles` / `delete_article` - 文章列表
//! - `list_categories` / `trending_topics` - 编辑器选项
//! - `preview_draft` / `export_draft` - 预览与导出

use serde::Serialize;
use tauri::{AppHandle, State};

use crate::commands::DialogConfirm;
use crate::error::AppError;
use crate::models::article::{Article, ArticleDraft};
use crate::models::dashboard::{Category, TrendingTopic};
use crate::services::export::{self, ArticleListItem, ArticlePreview, ExportFormat};
use crate::services::search::{self, ArticleQuery};
use crate::services::validation::{self, Requirement, SubmitTarget};
use crate::services::lifecycle;
use crate::state::AppState;

/// 保存/提交的结果：更新后的草稿 + 后端返回的文章
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub draft: ArticleDraft,
    pub article: Article,
}

#[tauri::command]
pub fn new_draft() -> ArticleDraft {
    ArticleDraft::new()
}

#[tauri::command]
pub fn draft_from_topic(topic: TrendingTopic) -> ArticleDraft {
    ArticleDraft::from_topic(&topic)
}

/// 打开已有文章进行编辑，优先使用缓存
#[tauri::command]
pub async fn open_article(id: String, state: State<'_, AppState>) -> Result<ArticleDraft, AppError> {
    if let Some(cached) = state.cache.get_article(&id) {
        return Ok(ArticleDraft::from_article(&cached));
    }

    let token = state.token()?;
    let article = state.guard(state.api()?.get_article(&token, &id).await).await?;
    state.cache.set_article(article.clone());
    Ok(ArticleDraft::from_article(&article))
}

#[tauri::command]
pub fn add_tag(mut draft: ArticleDraft, tag: String) -> ArticleDraft {
    draft.tags.add(&tag);
    draft
}

#[tauri::command]
pub fn remove_tag(mut draft: ArticleDraft, index: usize) -> ArticleDraft {
    draft.tags.remove(index);
    draft
}

#[tauri::command]
pub fn set_category(mut draft: ArticleDraft, category_id: Option<String>) -> ArticleDraft {
    draft.set_category(category_id);
    draft
}

/// 校验草稿，返回按固定顺序排列的违规信息
#[tauri::command]
pub fn validate_draft(draft: ArticleDraft, target: SubmitTarget) -> Vec<String> {
    validation::validate(&draft, target)
        .iter()
        .map(|v| v.to_string())
        .collect()
}

#[tauri::command]
pub fn review_checklist(draft: ArticleDraft) -> Vec<Requirement> {
    validation::review_checklist(&draft)
}

#[tauri::command]
pub async fn save_draft(
    mut draft: ArticleDraft,
    state: State<'_, AppState>,
) -> Result<SaveResult, AppError> {
    let token = state.token()?;
    let result = lifecycle::save_draft(&state.api()?, &token, &state.in_flight, &mut draft).await;
    let article = state.guard(result).await?;
    state.cache.invalidate_article(&article.id);
    Ok(SaveResult { draft, article })
}

#[tauri::command]
pub async fn submit_for_review(
    mut draft: ArticleDraft,
    state: State<'_, AppState>,
) -> Result<SaveResult, AppError> {
    let token = state.token()?;
    let result =
        lifecycle::submit_review(&state.api()?, &token, &state.in_flight, &mut draft).await;
    let article = state.guard(result).await?;
    state.cache.invalidate_article(&article.id);
    Ok(SaveResult { draft, article })
}

/// 文章列表，可按状态和搜索词过滤；每行带发布日期标签
#[tauri::command]
pub async fn list_articles(
    query: Option<ArticleQuery>,
    state: State<'_, AppState>,
) -> Result<Vec<ArticleListItem>, AppError> {
    let token = state.token()?;
    let articles = state.guard(state.api()?.list_articles(&token).await).await?;
    let articles = match query {
        Some(query) => search::filter_articles(&articles, &query),
        None => articles,
    };
    Ok(articles.into_iter().map(ArticleListItem::new).collect())
}

#[tauri::command]
pub async fn delete_article(
    id: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<(), AppError> {
    let token = state.token()?;
    let confirm = DialogConfirm::new(app);
    let result = lifecycle::delete_article(&state.api()?, &token, &confirm, &id).await;
    state.guard(result).await?;
    state.cache.invalidate_article(&id);
    Ok(())
}

/// 分类列表（TTL 缓存）
#[tauri::command]
pub async fn list_categories(state: State<'_, AppState>) -> Result<Vec<Category>, AppError> {
    if let Some(cached) = state.cache.get_categories() {
        return Ok(cached);
    }
    let categories = state.api()?.list_categories().await?;
    state.cache.set_categories(categories.clone());
    Ok(categories)
}

/// 当前活跃的趋势话题，按 `order` 排列，可按搜索词过滤
#[tauri::command]
pub async fn trending_topics(
    search: Option<String>,
    state: State<'_, AppState>,
) -> Result<Vec<TrendingTopic>, AppError> {
    let mut topics = state.api()?.trending_topics().await?;
    topics.sort_by_key(|t| t.order);
    Ok(search::filter_topics(&topics, search.as_deref().unwrap_or("")))
}

#[tauri::command]
pub fn preview_draft(draft: ArticleDraft) -> ArticlePreview {
    export::preview(&draft, chrono::Local::now().date_naive())
}

#[tauri::command]
pub fn export_draft(draft: ArticleDraft, format: ExportFormat) -> Result<String, AppError> {
    export::export(&draft, format)
}
