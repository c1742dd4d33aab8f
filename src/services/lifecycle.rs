//! # 文章生命周期
//!
//! 客户端可发起的转换只有两种：保存草稿（状态保持 `draft`）和提交审核
//! （`draft → pending_review`）。每次写入依次经过：
//!
//! 1. 可编辑检查：本地状态不是 `draft` 时直接拒绝（`Forbidden`），不发请求
//! 2. 校验门：对应档位的违规列表非空时返回 `Validation`
//! 3. 进行中标记：同一文章（或同一篇新草稿）已有写请求时返回 `Busy`
//! 4. 无 id 时创建，有 id 时更新
//!
//! 请求失败时草稿保持原样，进行中标记随守卫释放。

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::article::{Article, ArticleDraft, ArticlePayload};
use crate::services::api::ApiClient;
use crate::services::confirm::{self, Confirm};
use crate::services::validation::{SubmitTarget, validate};

/// 尚未保存过的草稿共用的进行中标记键
pub const NEW_DRAFT_KEY: &str = "new-draft";

/// 正在进行写请求的文章集合
#[derive(Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

/// 进行中标记守卫，drop 时释放
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// 占用 `key`；已被占用时返回 `Busy`
    pub fn try_acquire(&self, key: &str) -> AppResult<InFlightGuard<'_>> {
        let mut keys = self.keys.lock().unwrap_or_else(|p| p.into_inner());
        if !keys.insert(key.to_string()) {
            return Err(AppError::Busy("Saving this article".to_string()));
        }
        Ok(InFlightGuard {
            owner: self,
            key: key.to_string(),
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.keys
            .lock()
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut keys = self.owner.keys.lock().unwrap_or_else(|p| p.into_inner());
        keys.remove(&self.key);
    }
}

fn draft_key(draft: &ArticleDraft) -> &str {
    draft.id.as_deref().unwrap_or(NEW_DRAFT_KEY)
}

/// 本地状态不是 `draft` 的文章不允许再写入
pub fn ensure_editable(draft: &ArticleDraft) -> AppResult<()> {
    if draft.status.is_editable() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Articles with status '{}' can no longer be edited",
            draft.status.as_str()
        )))
    }
}

async fn persist(
    api: &ApiClient,
    token: &str,
    in_flight: &InFlight,
    draft: &mut ArticleDraft,
    target: SubmitTarget,
) -> AppResult<Article> {
    ensure_editable(draft)?;

    let violations = validate(draft, target);
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let _guard = in_flight.try_acquire(draft_key(draft))?;
    let payload = ArticlePayload::from_draft(draft, target.status());

    let article = match draft.id.as_deref() {
        Some(id) => api.update_article(token, id, &payload).await?,
        None => api.create_article(token, &payload).await?,
    };

    log::info!(
        "文章已保存: id={}, status={}",
        article.id,
        target.status().as_str()
    );
    draft.id = Some(article.id.clone());
    draft.status = target.status();
    Ok(article)
}

/// 保存草稿（草稿档位校验，状态保持 `draft`）
pub async fn save_draft(
    api: &ApiClient,
    token: &str,
    in_flight: &InFlight,
    draft: &mut ArticleDraft,
) -> AppResult<Article> {
    persist(api, token, in_flight, draft, SubmitTarget::Draft).await
}

/// 提交审核（完整校验，成功后本地状态变为 `pending_review`）
pub async fn submit_review(
    api: &ApiClient,
    token: &str,
    in_flight: &InFlight,
    draft: &mut ArticleDraft,
) -> AppResult<Article> {
    persist(api, token, in_flight, draft, SubmitTarget::PendingReview).await
}

/// 删除文章，发请求前必须经过用户确认
pub async fn delete_article(
    api: &ApiClient,
    token: &str,
    confirm: &dyn Confirm,
    id: &str,
) -> AppResult<()> {
    confirm::require(confirm, "Are you sure you want to delete this article?").await?;
    api.delete_article(token, id).await?;
    log::info!("文章已删除: {}", id);
    Ok(())
}
