//! Per-chat API credentials.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Access/refresh credentials for one chat. Fields are independent: a token
/// can exist with no refresh token and vice versa.
#[derive(Debug, Clone, Default)]
struct TokenRecord {
    access: Option<String>,
    refresh: Option<String>,
    expires_at_ms: Option<i64>,
}

/// chat id -> token record. The gateway consults this on every call and
/// never proactively checks expiry; a 401 is how invalidity is discovered.
#[derive(Default)]
pub struct TokenRegistry {
    inner: RwLock<HashMap<String, TokenRecord>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_token(&self, chat_id: &str, token: &str) {
        let mut map = self.inner.write().await;
        map.entry(chat_id.to_string()).or_default().access = Some(token.to_string());
    }

    pub async fn set_refresh_token(&self, chat_id: &str, token: &str) {
        let mut map = self.inner.write().await;
        map.entry(chat_id.to_string()).or_default().refresh = Some(token.to_string());
    }

    pub async fn set_expiry(&self, chat_id: &str, epoch_ms: i64) {
        let mut map = self.inner.write().await;
        map.entry(chat_id.to_string()).or_default().expires_at_ms = Some(epoch_ms);
    }

    pub async fn get_token(&self, chat_id: &str) -> Option<String> {
        if chat_id.is_empty() {
            return None;
        }
        self.inner
            .read()
            .await
            .get(chat_id)
            .and_then(|r| r.access.clone())
    }

    pub async fn get_refresh_token(&self, chat_id: &str) -> Option<String> {
        if chat_id.is_empty() {
            return None;
        }
        self.inner
            .read()
            .await
            .get(chat_id)
            .and_then(|r| r.refresh.clone())
    }

    pub async fn get_expiry(&self, chat_id: &str) -> Option<i64> {
        self.inner
            .read()
            .await
            .get(chat_id)
            .and_then(|r| r.expires_at_ms)
    }

    /// Removes access token, refresh token, and expiry in one map operation,
    /// so no partial-clear state is observable.
    pub async fn clear_token(&self, chat_id: &str) {
        self.inner.write().await.remove(chat_id);
    }
}
