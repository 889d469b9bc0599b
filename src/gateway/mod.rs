//! Outbound calls to the external payments API.
//!
//! The gateway attaches bearer tokens, normalizes the upstream's uneven
//! response shapes into a uniform [`ApiResult`], and performs at most one
//! refresh-and-retry when a call comes back 401. Handlers only ever see an
//! `ApiResult`; transport errors never cross this boundary as panics or raw
//! error types.

pub mod client;
pub mod envelope;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{HttpGateway, HttpSend, ReqwestSender};

/// REST paths on the payments API, kept in one table so tests and future
/// upstream changes touch a single place.
pub mod paths {
    pub const OTP_REQUEST: &str = "auth/otp/request";
    pub const OTP_VERIFY: &str = "auth/otp/verify";
    pub const TOKEN_REFRESH: &str = "auth/token/refresh";
    pub const PROFILE: &str = "users/me";
    pub const KYC_STATUS: &str = "kyc/status";
    pub const WALLET_BALANCES: &str = "wallets/balances";
    pub const TRANSFER_EMAIL: &str = "transfers/email";
    pub const TRANSFER_WALLET: &str = "transfers/wallet";
    pub const TRANSFER_BANK: &str = "transfers/bank";
    pub const TRANSFER_HISTORY: &str = "transfers";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Uniform result of every gateway call: success flag, chat-safe message,
/// optional raw payload for callers that extract fields, optional raw error
/// detail for logs.
#[derive(Debug, Clone)]
pub struct ApiResult {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    pub detail: Option<String>,
}

impl ApiResult {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            detail: None,
        }
    }

    pub fn fail(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            detail,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Timeout or connection failure; surfaced to the user as a distinct
    /// "try again later" outcome, never retried beyond the refresh path.
    #[error("payments service unreachable: {0}")]
    Unreachable(String),
    #[error("malformed response body: {0}")]
    BadBody(String),
}

/// Seam between conversation handlers and the real HTTP client, so flows can
/// be exercised against a recording mock.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        chat_id: &str,
    ) -> ApiResult;
}
