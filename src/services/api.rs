//! # 后端 REST API 客户端
//!
//! 基于 `reqwest` 的薄封装，负责：
//! - 拼接 URL（ID 等路径段自动转义）并附加 `Authorization: Bearer <token>`
//! - 按接口声明的响应结构解码：`{ data: T }` 信封或裸 JSON
//! - 把非 2xx 响应归类为 [`AppError`]（401 → `Unauthorized`，其余 → `Server`）
//!
//! ## 响应结构
//! 每个接口在调用处显式声明 [`Shape`]。响应体与声明不符时返回
//! `AppError::Decode`，不做 "有 data 就取 data，否则整体" 式的猜测。
//!
//! ## 超时
//! 所有请求共享 `AppConfig::request_timeout_secs` 超时，避免挂起的请求让
//! 进行中标记永远无法释放。不做任何自动重试。

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::models::article::{Article, ArticlePayload, ArticleStatus};
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use crate::models::dashboard::{Category, DashboardStats, TrendingTopic};
use crate::models::media::{MediaAsset, MediaMetadata, UploadFile};
use crate::models::message::{Message, UnreadCount};
use crate::models::settings::AppConfig;

/// 后端响应的外层结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{ "success": true, "data": T }`
    Enveloped,
    /// 直接是 `T`
    Bare,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// REST API 客户端
///
/// 内部的 `reqwest::Client` 自带连接池，克隆开销很小。
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// 按配置创建客户端
    ///
    /// # 错误
    /// API 地址无法解析或 HTTP 客户端初始化失败时返回配置错误
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Url::parse(&config.api_url)
            .map_err(|e| AppError::Config(format!("无效的 API 地址 {}: {}", config.api_url, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("初始化 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// API 基础地址（用于拼接媒体文件的完整 URL）
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ======== 请求基础设施 ========

    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("无效的 API 地址: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API 地址不能作为基础路径: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 发送请求并检查状态码，返回成功响应的原始字节
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> AppResult<Vec<u8>> {
        log::debug!("API 请求: {}", endpoint);

        let response = request.send().await.map_err(|e| {
            log::warn!("API 请求失败 {}: {}", endpoint, e);
            AppError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let err = error_from_response(status, &body);
            log::warn!("API {} 返回 {}: {}", endpoint, status.as_u16(), err);
            return Err(err);
        }

        Ok(body)
    }

    /// 发送请求并按声明的结构解码响应体
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        shape: Shape,
    ) -> AppResult<T> {
        let body = self.execute(endpoint, request).await?;
        decode(endpoint, &body, shape)
    }

    // ======== 认证 ========

    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let request = self
            .http
            .post(self.url(&["api", "auth", "login"])?)
            .json(&LoginRequest { email, password });
        self.fetch("POST /api/auth/login", request, Shape::Bare).await
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<RegisterResponse> {
        let request = self
            .http
            .post(self.url(&["api", "auth", "register"])?)
            .json(&RegisterRequest {
                email,
                username,
                password,
            });
        self.fetch("POST /api/auth/register", request, Shape::Bare).await
    }

    /// "who am I"：校验 token 并返回当前用户
    pub async fn me(&self, token: &str) -> AppResult<User> {
        let request = self
            .http
            .get(self.url(&["api", "auth", "me"])?)
            .bearer_auth(token);
        self.fetch("GET /api/auth/me", request, Shape::Bare).await
    }

    // ======== 文章 ========

    pub async fn list_articles(&self, token: &str) -> AppResult<Vec<Article>> {
        let request = self
            .http
            .get(self.url(&["api", "articles"])?)
            .bearer_auth(token);
        self.fetch("GET /api/articles", request, Shape::Enveloped).await
    }

    /// 按状态查询文章
    ///
    /// 后端可能忽略 `status` 查询参数，因此结果在客户端再过滤一次。
    pub async fn list_articles_by_status(
        &self,
        token: &str,
        status: ArticleStatus,
    ) -> AppResult<Vec<Article>> {
        let request = self
            .http
            .get(self.url(&["api", "articles"])?)
            .query(&[("status", status.as_str())])
            .bearer_auth(token);
        let articles: Vec<Article> = self
            .fetch("GET /api/articles?status", request, Shape::Enveloped)
            .await?;
        Ok(articles.into_iter().filter(|a| a.status == status).collect())
    }

    pub async fn get_article(&self, token: &str, id: &str) -> AppResult<Article> {
        let request = self
            .http
            .get(self.url(&["api", "articles", id])?)
            .bearer_auth(token);
        self.fetch("GET /api/articles/:id", request, Shape::Enveloped).await
    }

    pub async fn create_article(&self, token: &str, payload: &ArticlePayload) -> AppResult<Article> {
        let request = self
            .http
            .post(self.url(&["api", "articles"])?)
            .bearer_auth(token)
            .json(payload);
        self.fetch("POST /api/articles", request, Shape::Enveloped).await
    }

    pub async fn update_article(
        &self,
        token: &str,
        id: &str,
        payload: &ArticlePayload,
    ) -> AppResult<Article> {
        let request = self
            .http
            .put(self.url(&["api", "articles", id])?)
            .bearer_auth(token)
            .json(payload);
        self.fetch("PUT /api/articles/:id", request, Shape::Enveloped).await
    }

    pub async fn delete_article(&self, token: &str, id: &str) -> AppResult<()> {
        let request = self
            .http
            .delete(self.url(&["api", "articles", id])?)
            .bearer_auth(token);
        self.execute("DELETE /api/articles/:id", request).await?;
        Ok(())
    }

    // ======== 分类 / 话题（公开接口） ========

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let request = self.http.get(self.url(&["api", "categories"])?);
        self.fetch("GET /api/categories", request, Shape::Bare).await
    }

    pub async fn trending_topics(&self) -> AppResult<Vec<TrendingTopic>> {
        let request = self
            .http
            .get(self.url(&["api", "trending-topics", "active"])?);
        self.fetch("GET /api/trending-topics/active", request, Shape::Enveloped)
            .await
    }

    // ======== 媒体 ========

    pub async fn list_media(&self, token: &str) -> AppResult<Vec<MediaAsset>> {
        let request = self
            .http
            .get(self.url(&["api", "media"])?)
            .bearer_auth(token);
        self.fetch("GET /api/media", request, Shape::Enveloped).await
    }

    /// 上传单个文件（multipart，字段名 `file`）
    pub async fn upload_media(&self, token: &str, file: UploadFile) -> AppResult<MediaAsset> {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|e| AppError::Config(format!("无效的 MIME 类型 {}: {}", file.mime, e)))?;
        let request = self
            .http
            .post(self.url(&["api", "media", "upload"])?)
            .bearer_auth(token)
            .multipart(Form::new().part("file", part));
        self.fetch("POST /api/media/upload", request, Shape::Enveloped)
            .await
    }

    pub async fn update_media(
        &self,
        token: &str,
        id: &str,
        metadata: &MediaMetadata,
    ) -> AppResult<MediaAsset> {
        let request = self
            .http
            .put(self.url(&["api", "media", id])?)
            .bearer_auth(token)
            .json(metadata);
        self.fetch("PUT /api/media/:id", request, Shape::Enveloped).await
    }

    pub async fn delete_media(&self, token: &str, id: &str) -> AppResult<()> {
        let request = self
            .http
            .delete(self.url(&["api", "media", id])?)
            .bearer_auth(token);
        self.execute("DELETE /api/media/:id", request).await?;
        Ok(())
    }

    // ======== 仪表盘 / 消息 ========

    pub async fn dashboard_stats(&self, token: &str) -> AppResult<DashboardStats> {
        let request = self
            .http
            .get(self.url(&["api", "dashboard", "stats"])?)
            .bearer_auth(token);
        self.fetch("GET /api/dashboard/stats", request, Shape::Bare).await
    }

    pub async fn list_messages(&self, token: &str) -> AppResult<Vec<Message>> {
        let request = self
            .http
            .get(self.url(&["api", "messages"])?)
            .bearer_auth(token);
        self.fetch("GET /api/messages", request, Shape::Enveloped).await
    }

    pub async fn mark_message_read(&self, token: &str, id: &str) -> AppResult<()> {
        let request = self
            .http
            .patch(self.url(&["api", "messages", id, "read"])?)
            .bearer_auth(token);
        self.execute("PATCH /api/messages/:id/read", request).await?;
        Ok(())
    }

    pub async fn unread_count(&self, token: &str) -> AppResult<u64> {
        let request = self
            .http
            .get(self.url(&["api", "messages", "unread-count"])?)
            .bearer_auth(token);
        let count: UnreadCount = self
            .fetch("GET /api/messages/unread-count", request, Shape::Bare)
            .await?;
        Ok(count.count)
    }
}

/// 按声明的结构解码成功响应体
fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8], shape: Shape) -> AppResult<T> {
    let result = match shape {
        Shape::Enveloped => serde_json::from_slice::<Envelope<T>>(body).map(|e| e.data),
        Shape::Bare => serde_json::from_slice::<T>(body),
    };
    result.map_err(|e| AppError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// 把非 2xx 响应转换为错误
///
/// 优先使用 JSON 响应体中的 `message`；没有时使用原始文本；
/// 响应体为空则为 `API error: <status>`。
fn error_from_response(status: StatusCode, body: &[u8]) -> AppError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| format!("API error: {}", status.as_u16()));

    if status == StatusCode::UNAUTHORIZED {
        AppError::Unauthorized(message)
    } else {
        AppError::Server {
            status: status.as_u16(),
            message,
        }
    }
}
