//! Gateway refresh discipline: at most one refresh-and-retry per original
//! request, token clearance on terminal 401s, and the distinct unreachable
//! outcome.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use paymaster_bot::gateway::{GatewayError, HttpGateway, HttpSend, Method, PaymentsApi};
use paymaster_bot::session::TokenRegistry;
use serde_json::{json, Value};
use tokio::sync::Mutex;

enum Step {
    Respond(u16, Value),
    Unreachable(&'static str),
    BadBody(&'static str),
}

/// Scripted HTTP exchange log; every `send` pops the next step and records
/// what was sent.
#[derive(Default)]
struct ScriptedSender {
    steps: Mutex<VecDeque<Step>>,
    sent: Mutex<Vec<(String, Option<String>)>>, // (url, bearer)
}

impl ScriptedSender {
    fn scripted(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            sent: Mutex::new(Vec::new()),
        })
    }

    async fn sent_requests(&self) -> Vec<(String, Option<String>)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl HttpSend for ScriptedSender {
    async fn send(
        &self,
        _method: Method,
        url: &str,
        bearer: Option<&str>,
        _body: Option<&Value>,
    ) -> Result<(u16, Value), GatewayError> {
        self.sent
            .lock()
            .await
            .push((url.to_string(), bearer.map(str::to_string)));
        match self.steps.lock().await.pop_front() {
            Some(Step::Respond(status, body)) => Ok((status, body)),
            Some(Step::Unreachable(detail)) => Err(GatewayError::Unreachable(detail.into())),
            Some(Step::BadBody(detail)) => Err(GatewayError::BadBody(detail.into())),
            None => panic!("scripted sender ran out of steps"),
        }
    }
}

fn gateway(sender: Arc<ScriptedSender>, tokens: Arc<TokenRegistry>) -> HttpGateway {
    HttpGateway::with_sender("https://api.test", sender, tokens)
}

#[tokio::test]
async fn plain_success_attaches_bearer() {
    let sender = ScriptedSender::scripted(vec![Step::Respond(
        200,
        json!({ "status": true, "message": "ok" }),
    )]);
    let tokens = Arc::new(TokenRegistry::new());
    tokens.set_token("chat-1", "tok-1").await;
    let gw = gateway(sender.clone(), tokens);

    let result = gw
        .request(Method::Get, "wallets/balances", None, "chat-1")
        .await;
    assert!(result.success);
    let sent = sender.sent_requests().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "https://api.test/wallets/balances");
    assert_eq!(sent[0].1.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn unauthorized_with_no_refresh_token_clears_and_fails() {
    let sender = ScriptedSender::scripted(vec![Step::Respond(401, Value::Null)]);
    let tokens = Arc::new(TokenRegistry::new());
    tokens.set_token("chat-1", "stale").await;
    let gw = gateway(sender.clone(), tokens.clone());

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(!result.success);
    assert!(tokens.get_token("chat-1").await.is_none());
    // No refresh endpoint call was possible.
    assert_eq!(sender.sent_requests().await.len(), 1);
}

#[tokio::test]
async fn unauthorized_then_refresh_then_retry_succeeds_once() {
    let sender = ScriptedSender::scripted(vec![
        Step::Respond(401, Value::Null),
        Step::Respond(200, json!({ "token": "fresh" })),
        Step::Respond(200, json!({ "status": true, "message": "profile" })),
    ]);
    let tokens = Arc::new(TokenRegistry::new());
    tokens.set_token("chat-1", "stale").await;
    tokens.set_refresh_token("chat-1", "r-1").await;
    let gw = gateway(sender.clone(), tokens.clone());

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(result.success);
    assert_eq!(tokens.get_token("chat-1").await.as_deref(), Some("fresh"));

    let sent = sender.sent_requests().await;
    assert_eq!(sent.len(), 3, "original, refresh, single retry");
    assert_eq!(sent[1].0, "https://api.test/auth/token/refresh");
    // The retry carries the refreshed token.
    assert_eq!(sent[2].1.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn failed_refresh_clears_token_and_does_not_retry() {
    let sender = ScriptedSender::scripted(vec![
        Step::Respond(401, Value::Null),
        Step::Respond(401, json!({ "message": "refresh denied" })),
    ]);
    let tokens = Arc::new(TokenRegistry::new());
    tokens.set_token("chat-1", "stale").await;
    tokens.set_refresh_token("chat-1", "r-1").await;
    let gw = gateway(sender.clone(), tokens.clone());

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(!result.success);
    assert!(tokens.get_token("chat-1").await.is_none());
    // Exactly original + refresh; no second refresh, no retry.
    assert_eq!(sender.sent_requests().await.len(), 2);
}

#[tokio::test]
async fn second_unauthorized_after_refresh_is_terminal() {
    let sender = ScriptedSender::scripted(vec![
        Step::Respond(401, Value::Null),
        Step::Respond(200, json!({ "token": "fresh" })),
        Step::Respond(401, Value::Null),
    ]);
    let tokens = Arc::new(TokenRegistry::new());
    tokens.set_token("chat-1", "stale").await;
    tokens.set_refresh_token("chat-1", "r-1").await;
    let gw = gateway(sender.clone(), tokens.clone());

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(!result.success);
    assert!(tokens.get_token("chat-1").await.is_none());
    assert_eq!(sender.sent_requests().await.len(), 3);
}

#[tokio::test]
async fn transport_failure_is_a_distinct_unreachable_outcome() {
    let sender = ScriptedSender::scripted(vec![Step::Unreachable("connection refused")]);
    let tokens = Arc::new(TokenRegistry::new());
    let gw = gateway(sender, tokens);

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(!result.success);
    assert!(result.message.contains("unreachable"));
    assert_eq!(result.detail.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn unreadable_body_is_not_reported_as_unreachable() {
    let sender = ScriptedSender::scripted(vec![Step::BadBody("stream cut mid-body")]);
    let tokens = Arc::new(TokenRegistry::new());
    let gw = gateway(sender, tokens);

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(!result.success);
    assert!(result.message.contains("could not read"), "{}", result.message);
    assert!(!result.message.contains("unreachable"));
    assert_eq!(result.detail.as_deref(), Some("stream cut mid-body"));
}

#[tokio::test]
async fn ambiguous_ok_body_is_treated_as_success() {
    // Deliberate leniency: a 2xx with no recognizable marker still counts as
    // success, because the upstream side effect usually happened anyway.
    let sender = ScriptedSender::scripted(vec![Step::Respond(200, json!({ "weird": [1, 2] }))]);
    let tokens = Arc::new(TokenRegistry::new());
    let gw = gateway(sender, tokens);

    let result = gw
        .request(Method::Post, "auth/otp/request", Some(json!({})), "chat-1")
        .await;
    assert!(result.success);
}

#[tokio::test]
async fn upstream_error_message_is_surfaced() {
    let sender = ScriptedSender::scripted(vec![Step::Respond(
        422,
        json!({ "status": false, "message": "amount too small" }),
    )]);
    let tokens = Arc::new(TokenRegistry::new());
    let gw = gateway(sender, tokens);

    let result = gw
        .request(Method::Post, "transfers/email", Some(json!({})), "chat-1")
        .await;
    assert!(!result.success);
    assert_eq!(result.message, "amount too small");
}

#[tokio::test]
async fn token_like_message_content_is_redacted() {
    let sender = ScriptedSender::scripted(vec![Step::Respond(
        200,
        json!({ "status": true, "message": "issued eyJhbGciOiJIUzI1NiJ9.x1y2z3a4b5c6d7e8f9 for you" }),
    )]);
    let tokens = Arc::new(TokenRegistry::new());
    let gw = gateway(sender, tokens);

    let result = gw.request(Method::Get, "users/me", None, "chat-1").await;
    assert!(result.success);
    assert!(result.message.contains("[redacted]"), "{}", result.message);
    assert!(!result.message.contains("eyJ"));
}
