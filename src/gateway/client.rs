//! HTTP gateway to the payments API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{envelope, paths, ApiResult, GatewayError, Method, PaymentsApi};
use crate::session::TokenRegistry;
use crate::util::redact_tokens;

const MSG_UNREACHABLE: &str = "The payments service is unreachable right now. Please try again later.";
const MSG_SESSION_EXPIRED: &str = "Your session has expired. Use /login to sign in again.";
const MSG_BAD_BODY: &str = "The payments service sent a response we could not read. Please try again.";

/// One HTTP exchange. Separated from [`HttpGateway`] so the refresh-and-retry
/// discipline can be tested with a scripted sender instead of a live server.
#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(u16, Value), GatewayError>;
}

pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestSender {
    async fn send(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(u16, Value), GatewayError> {
        let mut req = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        if let Some(payload) = body {
            req = req.json(payload);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| GatewayError::BadBody(e.to_string()))?;
        // Empty and non-JSON bodies normalize to null; the envelope parser
        // treats that as an ambiguous response.
        let value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok((status, value))
    }
}

/// The production [`PaymentsApi`] implementation: bearer-token attachment,
/// shape normalization, and at most one refresh-and-retry per original
/// request.
pub struct HttpGateway {
    sender: Arc<dyn HttpSend>,
    base_url: String,
    tokens: Arc<TokenRegistry>,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<TokenRegistry>,
    ) -> Result<Self, GatewayError> {
        Ok(Self::with_sender(
            base_url,
            Arc::new(ReqwestSender::new(timeout)?),
            tokens,
        ))
    }

    /// Test seam: inject a scripted sender.
    pub fn with_sender(base_url: &str, sender: Arc<dyn HttpSend>, tokens: Arc<TokenRegistry>) -> Self {
        Self {
            sender,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// One refresh attempt against the fixed refresh endpoint. Returns true
    /// only when a new access token was stored. Never recurses into
    /// `request`, so a refresh endpoint that itself answers 401 cannot loop.
    async fn refresh(&self, chat_id: &str) -> bool {
        let Some(refresh_token) = self.tokens.get_refresh_token(chat_id).await else {
            debug!(target: "gateway", chat_id, "no refresh token stored");
            return false;
        };
        let payload = json!({ "refreshToken": refresh_token });
        let outcome = self
            .sender
            .send(Method::Post, &self.url(paths::TOKEN_REFRESH), None, Some(&payload))
            .await;
        let (status, body) = match outcome {
            Ok(pair) => pair,
            Err(e) => {
                warn!(target: "gateway", chat_id, error = %e, "token refresh transport failure");
                return false;
            }
        };
        if status >= 400 {
            warn!(target: "gateway", chat_id, status, "token refresh rejected");
            return false;
        }
        let extracted = envelope::parse(&body);
        let Some(token) = extracted.token else {
            warn!(target: "gateway", chat_id, shape = ?extracted.shape, "refresh response had no token");
            return false;
        };
        self.tokens.set_token(chat_id, &token).await;
        if let Some(rt) = extracted.refresh_token {
            self.tokens.set_refresh_token(chat_id, &rt).await;
        }
        if let Some(exp) = extracted.expires_at_ms {
            self.tokens.set_expiry(chat_id, exp).await;
        }
        true
    }

    fn normalize(&self, status: u16, body: Value) -> ApiResult {
        let extracted = envelope::parse(&body);
        let ok = status < 400 && extracted.ok;
        let message = match (&extracted.message, ok) {
            (Some(m), _) => redact_tokens(m),
            (None, true) => "Done.".to_string(),
            (None, false) => format!("The payments service rejected the request ({status})."),
        };
        debug!(target: "gateway", status, ok, shape = ?extracted.shape, "response normalized");
        if ok {
            ApiResult::ok(message, Some(body))
        } else {
            ApiResult {
                success: false,
                message,
                data: Some(body),
                detail: Some(format!("http status {status}")),
            }
        }
    }
}

#[async_trait]
impl PaymentsApi for HttpGateway {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        chat_id: &str,
    ) -> ApiResult {
        let url = self.url(path);
        let bearer = self.tokens.get_token(chat_id).await;
        debug!(target: "gateway", %url, authed = bearer.is_some(), "outbound request");

        let first = self
            .sender
            .send(method, &url, bearer.as_deref(), payload.as_ref())
            .await;
        let (status, body) = match first {
            Ok(pair) => pair,
            Err(GatewayError::Unreachable(detail)) => {
                return ApiResult::fail(MSG_UNREACHABLE, Some(detail));
            }
            Err(GatewayError::BadBody(detail)) => {
                return ApiResult::fail(MSG_BAD_BODY, Some(detail));
            }
        };

        if status != 401 {
            return self.normalize(status, body);
        }

        // Reactive token recovery: exactly one refresh, exactly one retry.
        if !self.refresh(chat_id).await {
            self.tokens.clear_token(chat_id).await;
            return ApiResult::fail(MSG_SESSION_EXPIRED, Some("http status 401".into()));
        }
        let bearer = self.tokens.get_token(chat_id).await;
        let retry = self
            .sender
            .send(method, &url, bearer.as_deref(), payload.as_ref())
            .await;
        match retry {
            Ok((retry_status, retry_body)) if retry_status != 401 => {
                self.normalize(retry_status, retry_body)
            }
            Ok(_) => {
                // Still 401 on the refreshed token: terminal for this request.
                self.tokens.clear_token(chat_id).await;
                ApiResult::fail(MSG_SESSION_EXPIRED, Some("http status 401 after refresh".into()))
            }
            Err(GatewayError::Unreachable(detail)) => ApiResult::fail(MSG_UNREACHABLE, Some(detail)),
            Err(GatewayError::BadBody(detail)) => ApiResult::fail(MSG_BAD_BODY, Some(detail)),
        }
    }
}
