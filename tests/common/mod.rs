//! Shared fixtures: a recording mock of the payments API and an `AppState`
//! builder around it.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use paymaster_bot::dispatch::MismatchPolicy;
use paymaster_bot::gateway::{ApiResult, Method, PaymentsApi};
use paymaster_bot::model::AppState;
use paymaster_bot::session::TokenRegistry;

/// Scripted [`PaymentsApi`] that records every call. Responses are queued
/// per path; a path with no stub answers with a failure so tests notice
/// unexpected calls.
#[derive(Default)]
pub struct MockApi {
    responses: Mutex<HashMap<String, VecDeque<ApiResult>>>,
    calls: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn stub(&self, path: &str, result: ApiResult) {
        self.responses
            .lock()
            .await
            .entry(path.to_string())
            .or_default()
            .push_back(result);
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Payloads of every call made to `path`, in order.
    pub async fn payloads_for(&self, path: &str) -> Vec<Option<Value>> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|(_, p, _)| p == path)
            .map(|(_, _, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl PaymentsApi for MockApi {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        _chat_id: &str,
    ) -> ApiResult {
        // Query strings don't participate in stub lookup.
        let key = path.split('?').next().unwrap_or(path).to_string();
        self.calls
            .lock()
            .await
            .push((method, key.clone(), payload));
        self.responses
            .lock()
            .await
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| ApiResult::fail(format!("no stub for {key}"), None))
    }
}

pub fn app_with(api: Arc<MockApi>) -> AppState {
    app_with_policy(api, MismatchPolicy::default())
}

pub fn app_with_policy(api: Arc<MockApi>, policy: MismatchPolicy) -> AppState {
    AppState::new(api, Arc::new(TokenRegistry::new()), policy)
}

/// Seed an authenticated session directly, skipping the login flow.
pub async fn seed_authenticated(app: &AppState, chat_id: &str) {
    app.sessions
        .set_session(chat_id, |s| {
            s.email = Some("user@example.com".into());
            s.organization_id = Some("org-1".into());
            s.state = paymaster_bot::session::ConversationState::MainMenu;
        })
        .await;
    app.tokens.set_token(chat_id, "seeded-token").await;
}
