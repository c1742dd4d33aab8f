//! # 通知轮询
//!
//! 仪表盘挂载且会话有效时启动的周期任务（默认 30 秒），每个周期独立读取两项计数：
//! - 未读消息数（`GET /api/messages/unread-count`）
//! - 待审核文章数（`GET /api/articles?status=pending_review`）
//!
//! 任一读取失败时该项保持上一次的值，另一项照常更新。
//! 每个周期结束后把当前计数推送给监听者（桌面端转发为前端事件）。
//!
//! 认证失败不按普通读取失败处理：周期任务通知 [`SessionLoss`] 后自行退出，
//! `refresh_once` 把错误返回给调用方。
//!
//! 再次 `start` 会先停止正在运行的任务；`stop` 和 drop 都会中止任务。

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{AppError, AppResult};
use crate::models::article::ArticleStatus;
use crate::models::dashboard::NotificationCounts;
use crate::services::api::ApiClient;

/// 默认轮询周期
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// 通知计数的数据源
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn unread_messages(&self, token: &str) -> AppResult<u64>;
    async fn pending_articles(&self, token: &str) -> AppResult<u64>;
}

#[async_trait]
impl NotificationSource for ApiClient {
    async fn unread_messages(&self, token: &str) -> AppResult<u64> {
        self.unread_count(token).await
    }

    async fn pending_articles(&self, token: &str) -> AppResult<u64> {
        let articles = self
            .list_articles_by_status(token, ArticleStatus::PendingReview)
            .await?;
        Ok(articles.len() as u64)
    }
}

/// 计数变化监听者
pub type CountsListener = Arc<dyn Fn(NotificationCounts) + Send + Sync>;

/// 轮询中发现会话失效时的处理方（结束会话）
#[async_trait]
pub trait SessionLoss: Send + Sync {
    async fn session_lost(&self);
}

pub struct NotificationPoller {
    counts: Arc<RwLock<NotificationCounts>>,
    listener: Option<CountsListener>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationPoller {
    pub fn new(listener: Option<CountsListener>) -> Self {
        Self {
            counts: Arc::new(RwLock::new(NotificationCounts::default())),
            listener,
            task: Mutex::new(None),
        }
    }

    /// 当前计数快照
    pub fn counts(&self) -> NotificationCounts {
        self.counts.read().map(|c| *c).unwrap_or_default()
    }

    /// 立即执行一次周期外的刷新（手动刷新、标记已读之后）
    ///
    /// 普通读取失败时保留旧值；任一读取认证失败时返回该错误。
    pub async fn refresh_once(
        &self,
        source: &dyn NotificationSource,
        token: &str,
    ) -> AppResult<NotificationCounts> {
        tick(&self.counts, self.listener.as_ref(), source, token).await
    }

    /// 启动周期任务，首个周期立即执行
    ///
    /// 周期任务遇到认证失败时调用 `on_session_lost` 并退出。
    pub fn start(
        &self,
        source: Arc<dyn NotificationSource>,
        token: String,
        period: Duration,
        on_session_lost: Option<Arc<dyn SessionLoss>>,
    ) {
        self.stop();

        let counts = Arc::clone(&self.counts);
        let listener = self.listener.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // 慢请求之后不补发周期，保持固定间隔
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match tick(&counts, listener.as_ref(), source.as_ref(), &token).await {
                    Ok(_) => {}
                    Err(e) if e.is_auth_failure() => {
                        log::warn!("通知轮询认证失败，停止轮询: {}", e);
                        if let Some(handler) = &on_session_lost {
                            handler.session_lost().await;
                        }
                        break;
                    }
                    Err(e) => log::warn!("通知轮询失败: {}", e),
                }
            }
        });

        if let Ok(mut task) = self.task.lock() {
            *task = Some(handle);
        }
        log::info!("通知轮询已启动，周期 {} 秒", period.as_secs());
    }

    /// 停止周期任务（未运行时无操作）
    pub fn stop(&self) {
        let handle = match self.task.lock() {
            Ok(mut task) => task.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            handle.abort();
            log::info!("通知轮询已停止");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick(
    counts: &RwLock<NotificationCounts>,
    listener: Option<&CountsListener>,
    source: &dyn NotificationSource,
    token: &str,
) -> AppResult<NotificationCounts> {
    let (unread, pending) = tokio::join!(
        source.unread_messages(token),
        source.pending_articles(token)
    );

    let mut auth_error = None;
    let snapshot = {
        let mut current = counts
            .write()
            .map_err(|_| AppError::Config("通知计数状态不可用".to_string()))?;
        match unread {
            Ok(n) => current.unread_messages = n,
            Err(e) if e.is_auth_failure() => auth_error = Some(e),
            Err(e) => log::warn!("获取未读消息数失败: {}", e),
        }
        match pending {
            Ok(n) => current.pending_articles = n,
            Err(e) if e.is_auth_failure() => {
                auth_error.get_or_insert(e);
            }
            Err(e) => log::warn!("获取待审核文章数失败: {}", e),
        }
        *current
    };

    if let Some(e) = auth_error {
        return Err(e);
    }
    if let Some(listener) = listener {
        listener(snapshot);
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use super::*;
    use crate::error::AppError;

    #[derive(Default)]
    struct FakeSource {
        calls: AtomicU64,
        unread: AtomicU64,
        pending: AtomicU64,
        fail_unread: AtomicBool,
        fail_pending: AtomicBool,
        expired: AtomicBool,
    }

    #[derive(Default)]
    struct RecordLoss {
        lost: AtomicU64,
    }

    #[async_trait]
    impl SessionLoss for RecordLoss {
        async fn session_lost(&self) {
            self.lost.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl NotificationSource for FakeSource {
        async fn unread_messages(&self, _token: &str) -> AppResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_unread.load(Ordering::SeqCst) {
                return Err(AppError::Network("offline".into()));
            }
            Ok(self.unread.load(Ordering::SeqCst))
        }

        async fn pending_articles(&self, _token: &str) -> AppResult<u64> {
            if self.expired.load(Ordering::SeqCst) {
                return Err(AppError::Unauthorized("expired".into()));
            }
            if self.fail_pending.load(Ordering::SeqCst) {
                return Err(AppError::Network("offline".into()));
            }
            Ok(self.pending.load(Ordering::SeqCst))
        }
    }

    #[tokio::test]
    async fn test_failed_read_keeps_previous_count() {
        let source = FakeSource::default();
        source.unread.store(4, Ordering::SeqCst);
        source.pending.store(2, Ordering::SeqCst);
        let poller = NotificationPoller::new(None);

        let first = poller.refresh_once(&source, "t").await.unwrap();
        assert_eq!(first.unread_messages, 4);
        assert_eq!(first.pending_articles, 2);

        source.unread.store(9, Ordering::SeqCst);
        source.pending.store(7, Ordering::SeqCst);
        source.fail_unread.store(true, Ordering::SeqCst);
        let second = poller.refresh_once(&source, "t").await.unwrap();
        assert_eq!(second.unread_messages, 4);
        assert_eq!(second.pending_articles, 7);

        source.fail_unread.store(false, Ordering::SeqCst);
        source.fail_pending.store(true, Ordering::SeqCst);
        let third = poller.refresh_once(&source, "t").await.unwrap();
        assert_eq!(third.unread_messages, 9);
        assert_eq!(third.pending_articles, 7);
    }

    #[tokio::test]
    async fn test_listener_receives_every_tick() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let poller = NotificationPoller::new(Some(Arc::new(move |c: NotificationCounts| {
            sink.lock().unwrap().push(c.unread_messages);
        })));

        let source = FakeSource::default();
        source.unread.store(1, Ordering::SeqCst);
        poller.refresh_once(&source, "t").await.unwrap();
        source.unread.store(3, Ordering::SeqCst);
        poller.refresh_once(&source, "t").await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval_until_stopped() {
        let source = Arc::new(FakeSource::default());
        let poller = NotificationPoller::new(None);

        poller.start(source.clone(), "t".into(), DEFAULT_POLL_INTERVAL, None);
        assert!(poller.is_running());

        // 0s、30s、60s 各一次
        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        poller.stop();
        assert!(!poller.is_running());
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_running_task() {
        let first = Arc::new(FakeSource::default());
        let second = Arc::new(FakeSource::default());
        let poller = NotificationPoller::new(None);

        poller.start(first.clone(), "t".into(), DEFAULT_POLL_INTERVAL, None);
        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.start(second.clone(), "t".into(), DEFAULT_POLL_INTERVAL, None);
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_once_reports_auth_failure() {
        let source = FakeSource::default();
        source.unread.store(2, Ordering::SeqCst);
        let seen = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&seen);
        let poller = NotificationPoller::new(Some(Arc::new(move |_c: NotificationCounts| {
            sink.fetch_add(1, Ordering::SeqCst);
        })));

        source.expired.store(true, Ordering::SeqCst);
        let err = poller.refresh_once(&source, "t").await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_ends_the_loop() {
        let source = Arc::new(FakeSource::default());
        let loss = Arc::new(RecordLoss::default());
        let poller = NotificationPoller::new(None);

        poller.start(
            source.clone(),
            "t".into(),
            DEFAULT_POLL_INTERVAL,
            Some(loss.clone() as Arc<dyn SessionLoss>),
        );
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(loss.lost.load(Ordering::SeqCst), 0);

        source.expired.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(loss.lost.load(Ordering::SeqCst), 1);
        assert!(!poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_tick_does_not_burst() {
        struct SlowSource {
            calls: AtomicU64,
        }

        #[async_trait]
        impl NotificationSource for SlowSource {
            async fn unread_messages(&self, _token: &str) -> AppResult<u64> {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    tokio::time::sleep(Duration::from_secs(45)).await;
                }
                Ok(0)
            }

            async fn pending_articles(&self, _token: &str) -> AppResult<u64> {
                Ok(0)
            }
        }

        let source = Arc::new(SlowSource {
            calls: AtomicU64::new(0),
        });
        let poller = NotificationPoller::new(None);
        poller.start(source.clone(), "t".into(), DEFAULT_POLL_INTERVAL, None);

        // 首个周期在 45 秒结束并立即补一次；之后从 45 秒起按周期计时（75 秒），
        // 不会在 60 秒再追一次
        tokio::time::sleep(Duration::from_secs(46)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
