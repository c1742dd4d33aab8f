//! # 消息收件箱
//!
//! 刷新失败时保留上一次成功获取的列表，并把错误信息一并返回给前端展示；
//! 认证失败例外，直接向上传递以便清空会话。

use std::sync::RwLock;

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::message::Message;
use crate::services::api::ApiClient;
use crate::services::polling::NotificationPoller;

const LOAD_FAILED: &str = "Could not load messages. Please check your connection and try again.";

/// 收件箱视图：当前列表 + 最近一次刷新的错误
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxView {
    pub messages: Vec<Message>,
    pub unread: usize,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct Inbox {
    messages: RwLock<Vec<Message>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn view(&self, error: Option<String>) -> InboxView {
        let messages = self.messages.read().map(|m| m.clone()).unwrap_or_default();
        let unread = messages.iter().filter(|m| !m.is_read).count();
        InboxView {
            messages,
            unread,
            error,
        }
    }

    /// 本地查找单条消息
    pub fn get(&self, id: &str) -> AppResult<Message> {
        self.messages
            .read()
            .ok()
            .and_then(|messages| messages.iter().find(|m| m.id == id).cloned())
            .ok_or_else(|| AppError::NotFound(format!("Message {}", id)))
    }

    /// 重新获取消息列表
    pub async fn refresh(&self, api: &ApiClient, token: &str) -> AppResult<InboxView> {
        match api.list_messages(token).await {
            Ok(messages) => {
                if let Ok(mut current) = self.messages.write() {
                    *current = messages;
                }
                Ok(self.view(None))
            }
            Err(e) if e.is_auth_failure() => Err(e),
            Err(e) => {
                log::warn!("获取消息失败，保留上次的列表: {}", e);
                Ok(self.view(Some(LOAD_FAILED.to_string())))
            }
        }
    }

    /// 标记已读
    ///
    /// 无论本地状态如何都会调用接口；成功后本地副本标记为已读，重新获取列表，
    /// 并立即刷新一次通知计数。
    pub async fn mark_read(
        &self,
        api: &ApiClient,
        token: &str,
        poller: &NotificationPoller,
        id: &str,
    ) -> AppResult<InboxView> {
        api.mark_message_read(token, id).await?;

        if let Ok(mut messages) = self.messages.write() {
            if let Some(message) = messages.iter_mut().find(|m| m.id == id) {
                message.is_read = true;
            }
        }

        let view = self.refresh(api, token).await?;
        poller.refresh_once(api, token).await?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&AppConfig {
            api_url: server.uri(),
            ..AppConfig::default()
        })
        .unwrap()
    }

    fn message(id: &str, is_read: bool) -> serde_json::Value {
        json!({
            "id": id,
            "subject": "Review notes",
            "body": "Please add a source.",
            "isRead": is_read,
            "createdAt": "2026-10-18T09:00:00Z",
            "from": { "username": "editor" }
        })
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_last_good_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [message("m1", false), message("m2", true)] })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let inbox = Inbox::new();
        let api = api_for(&server);

        let first = inbox.refresh(&api, "t").await.unwrap();
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.unread, 1);
        assert!(first.error.is_none());

        let second = inbox.refresh(&api, "t").await.unwrap();
        assert_eq!(second.messages.len(), 2);
        assert_eq!(second.error.as_deref(), Some(LOAD_FAILED));
        assert_eq!(inbox.get("m2").unwrap().subject, "Review notes");
        assert_eq!(inbox.get("zzz").unwrap_err().kind(), "not_found");
    }

    #[tokio::test]
    async fn test_refresh_propagates_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = Inbox::new().refresh(&api_for(&server), "t").await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_mark_read_calls_endpoint_refetches_and_refreshes_counts() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/messages/m1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [message("m1", true)] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages/unread-count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let inbox = Inbox::new();
        let poller = NotificationPoller::new(None);

        let view = inbox.mark_read(&api, "t", &poller, "m1").await.unwrap();
        assert_eq!(view.unread, 0);
        assert!(inbox.get("m1").unwrap().is_read);

        // 已读消息再次标记仍会调用接口
        inbox.mark_read(&api, "t", &poller, "m1").await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_read_surfaces_auth_failure_from_count_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/messages/m1/read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [message("m1", true)] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages/unread-count"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let poller = NotificationPoller::new(None);
        let err = Inbox::new()
            .mark_read(&api_for(&server), "t", &poller, "m1")
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
    }
}
