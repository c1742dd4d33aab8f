//! # 应用全局状态
//!
//! 通过 Tauri 的 `manage()` 注册，所有 command 通过 `State<AppState>` 访问。
//! 聚合了配置、API 客户端、会话、通知轮询、缓存、进行中标记和收件箱。
//!
//! 任何接口返回认证失败时，经 [`AppState::guard`] 统一结束会话：
//! 停止轮询、清除 token、清空缓存。后台轮询任务不经过 command，
//! 由 [`SessionTeardown`] 完成同样的清理后自行退出。

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::settings::AppConfig;
use crate::services::api::ApiClient;
use crate::services::cache::AppCache;
use crate::services::config;
use crate::services::inbox::Inbox;
use crate::services::lifecycle::InFlight;
use crate::services::polling::{CountsListener, NotificationPoller, SessionLoss};
use crate::services::session::{SessionContext, TokenStore};

pub struct AppState {
    config_path: PathBuf,
    config: RwLock<AppConfig>,
    api: RwLock<ApiClient>,
    pub session: Arc<SessionContext>,
    pub poller: NotificationPoller,
    pub cache: Arc<AppCache>,
    pub in_flight: InFlight,
    pub inbox: Inbox,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        token_store: Box<dyn TokenStore>,
        listener: Option<CountsListener>,
    ) -> AppResult<Self> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config_path,
            config: RwLock::new(config),
            api: RwLock::new(api),
            session: Arc::new(SessionContext::new(token_store)),
            poller: NotificationPoller::new(listener),
            cache: Arc::new(AppCache::new()),
            in_flight: InFlight::new(),
            inbox: Inbox::new(),
        })
    }

    /// 当前 API 客户端（克隆开销很小）
    pub fn api(&self) -> AppResult<ApiClient> {
        self.api
            .read()
            .map(|api| api.clone())
            .map_err(|_| AppError::Config("API 客户端状态不可用".to_string()))
    }

    pub fn config(&self) -> AppConfig {
        self.config
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// 当前 bearer token，未登录时返回认证错误
    pub fn token(&self) -> AppResult<String> {
        self.session.token()
    }

    /// 保存新配置并重建 API 客户端；轮询正在运行时按新周期重启
    pub async fn update_config(&self, new_config: AppConfig) -> AppResult<AppConfig> {
        let saved = config::save_config(&self.config_path, new_config).await?;
        let effective = saved
            .clone()
            .with_env_overrides(|key| std::env::var(key).ok());
        let api = ApiClient::new(&effective)?;

        if let Ok(mut current) = self.api.write() {
            *current = api;
        }
        if let Ok(mut current) = self.config.write() {
            *current = effective.clone();
        }

        if self.poller.is_running() {
            self.start_polling()?;
        }
        Ok(effective)
    }

    /// 以当前会话启动通知轮询（已在运行时替换旧任务）
    pub fn start_polling(&self) -> AppResult<()> {
        let token = self.token()?;
        let period = Duration::from_secs(self.config().poll_interval_secs);
        let teardown = SessionTeardown {
            session: Arc::clone(&self.session),
            cache: Arc::clone(&self.cache),
        };
        self.poller
            .start(Arc::new(self.api()?), token, period, Some(Arc::new(teardown)));
        Ok(())
    }

    /// 结束会话：停止轮询、清除 token 和缓存
    pub async fn end_session(&self) {
        self.poller.stop();
        self.session.logout().await;
        self.cache.clear();
    }

    /// 检查接口结果，认证失败时结束会话后原样返回错误
    pub async fn guard<T>(&self, result: AppResult<T>) -> AppResult<T> {
        let auth_failed = match &result {
            Err(e) if e.is_auth_failure() => {
                log::warn!("认证失败，结束会话: {}", e);
                true
            }
            _ => false,
        };
        if auth_failed {
            self.end_session().await;
        }
        result
    }
}

/// 轮询任务发现认证失败时清除会话和缓存（任务随后自行退出）
struct SessionTeardown {
    session: Arc<SessionContext>,
    cache: Arc<AppCache>,
}

#[async_trait]
impl SessionLoss for SessionTeardown {
    async fn session_lost(&self) {
        self.session.logout().await;
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::{FileTokenStore, SessionStatus};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn logged_in_state(server: &MockServer, dir: &tempfile::TempDir) -> AppState {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok",
                "user": { "id": "u1", "email": "w@example.com", "username": "w", "role": "creator" }
            })))
            .mount(server)
            .await;

        let config = AppConfig {
            api_url: server.uri(),
            ..AppConfig::default()
        };
        let state = AppState::new(
            config,
            dir.path().join("config.json"),
            Box::new(FileTokenStore::new(dir.path().join("session.json"))),
            None,
        )
        .unwrap();
        state
            .session
            .login(&state.api().unwrap(), "w@example.com", "pw")
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_auth_failure_stops_polling_and_clears_session() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in_state(&server, &dir).await;

        state.start_polling().unwrap();
        assert!(state.poller.is_running());
        assert!(dir.path().join("session.json").exists());

        let result: AppResult<()> = state
            .guard(Err(AppError::Unauthorized("expired".into())))
            .await;
        assert!(result.is_err());
        assert!(!state.poller.is_running());
        assert_eq!(state.session.status(), SessionStatus::Anonymous);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_polling_401_ends_session() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in_state(&server, &dir).await;
        Mock::given(method("GET"))
            .and(path("/api/messages/unread-count"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        state.start_polling().unwrap();
        for _ in 0..50 {
            if !state.poller.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert!(!state.poller.is_running());
        assert_eq!(state.session.status(), SessionStatus::Anonymous);
        assert!(!dir.path().join("session.json").exists());
        assert!(state.token().is_err());
    }

    #[tokio::test]
    async fn test_other_errors_keep_session() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in_state(&server, &dir).await;

        let _ = state
            .guard::<()>(Err(AppError::Network("offline".into())))
            .await;
        assert!(state.session.is_ready());
    }

    #[tokio::test]
    async fn test_update_config_persists_and_rebuilds_client() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = logged_in_state(&server, &dir).await;

        let mut next = state.config();
        next.poll_interval_secs = 60;
        let saved = state.update_config(next).await.unwrap();

        assert_eq!(saved.poll_interval_secs, 60);
        assert_eq!(state.config().poll_interval_secs, 60);
        assert!(dir.path().join("config.json").exists());
        assert!(state.token().is_ok());
    }

    #[test]
    fn test_polling_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            AppConfig::default(),
            dir.path().join("config.json"),
            Box::new(FileTokenStore::new(dir.path().join("session.json"))),
            None,
        )
        .unwrap();
        assert!(state.start_polling().unwrap_err().is_auth_failure());
    }
}
