//! # 会话上下文
//!
//! 持有当前用户和 bearer token，生命周期：
//!
//! ```text
//! Initializing ──init()──► 读取持久化 token ──me()──► Ready
//!                                │                  └─► Anonymous（401/403 时同时清除 token）
//!                                └─ 无 token ───────────► Anonymous
//! Ready ──logout() / 认证失败──► Anonymous
//! ```
//!
//! 网络错误导致的 `me()` 失败只让本次启动进入 Anonymous，不删除已保存的 token，
//! 下次启动仍会重新校验。

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::auth::{Session, User};
use crate::services::api::ApiClient;

/// token 持久化存储
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> AppResult<Option<String>>;
    async fn save(&self, token: &str) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
}

#[derive(Serialize, Deserialize)]
struct PersistedToken {
    token: String,
}

/// 基于 JSON 文件的 token 存储（`~/.creator-dashboard/session.json`）
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        // 文件损坏视为未登录
        Ok(serde_json::from_str::<PersistedToken>(&content)
            .ok()
            .map(|p| p.token)
            .filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string(&PersistedToken {
            token: token.to_string(),
        })?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 返回给前端的会话状态（不含 token）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Initializing,
    Ready { user: User },
    Anonymous,
}

enum Phase {
    Initializing,
    Ready(Session),
    Anonymous,
}

/// 会话上下文，作为应用状态的一部分被所有 command 共享
pub struct SessionContext {
    store: Box<dyn TokenStore>,
    phase: RwLock<Phase>,
}

impl SessionContext {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            store,
            phase: RwLock::new(Phase::Initializing),
        }
    }

    fn set_phase(&self, phase: Phase) {
        if let Ok(mut current) = self.phase.write() {
            *current = phase;
        }
    }

    /// 当前状态快照
    pub fn status(&self) -> SessionStatus {
        match self.phase.read().as_deref() {
            Ok(Phase::Ready(session)) => SessionStatus::Ready {
                user: session.user.clone(),
            },
            Ok(Phase::Initializing) => SessionStatus::Initializing,
            _ => SessionStatus::Anonymous,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase.read().as_deref(), Ok(Phase::Ready(_)))
    }

    /// 当前 bearer token；未登录时返回认证错误
    pub fn token(&self) -> AppResult<String> {
        match self.phase.read().as_deref() {
            Ok(Phase::Ready(session)) => Ok(session.token.clone()),
            _ => Err(AppError::Unauthorized("Not logged in".to_string())),
        }
    }

    /// 启动时用持久化 token 恢复会话
    pub async fn init(&self, api: &ApiClient) -> SessionStatus {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set_phase(Phase::Anonymous);
                return SessionStatus::Anonymous;
            }
            Err(e) => {
                log::warn!("读取已保存的会话失败: {}", e);
                self.set_phase(Phase::Anonymous);
                return SessionStatus::Anonymous;
            }
        };

        match api.me(&token).await {
            Ok(user) => {
                log::info!("会话已恢复: {}", user.email);
                self.set_phase(Phase::Ready(Session { user, token }));
            }
            Err(e) if e.is_auth_failure() => {
                log::info!("已保存的 token 已失效，清除会话");
                if let Err(e) = self.store.clear().await {
                    log::warn!("清除会话文件失败: {}", e);
                }
                self.set_phase(Phase::Anonymous);
            }
            Err(e) => {
                log::warn!("校验会话失败（保留 token）: {}", e);
                self.set_phase(Phase::Anonymous);
            }
        }

        self.status()
    }

    /// 登录并持久化 token
    pub async fn login(&self, api: &ApiClient, email: &str, password: &str) -> AppResult<User> {
        let response = api.login(email, password).await?;
        if let Err(e) = self.store.save(&response.token).await {
            // 持久化失败只影响下次启动，本次会话照常可用
            log::warn!("保存会话失败: {}", e);
        }
        log::info!("登录成功: {}", response.user.email);
        let user = response.user.clone();
        self.set_phase(Phase::Ready(Session {
            user: response.user,
            token: response.token,
        }));
        Ok(user)
    }

    /// 登出：清除内存会话和持久化 token
    pub async fn logout(&self) {
        self.set_phase(Phase::Anonymous);
        if let Err(e) = self.store.clear().await {
            log::warn!("清除会话文件失败: {}", e);
        }
    }
}
