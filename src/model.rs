//! Shared application state stored in Serenity's global context.

use std::sync::Arc;

use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;

use crate::dispatch::MismatchPolicy;
use crate::gateway::PaymentsApi;
use crate::session::{SessionStore, TokenRegistry};

/// A container for the ShardManager, allowing it to be stored in the global
/// context.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

/// The central, shared state of the application. Built once at startup and
/// injected into every handler; nothing here is ambient module state, so
/// tests construct their own instance with a mocked gateway.
pub struct AppState {
    /// Per-chat conversation records. Volatile, process lifetime.
    pub sessions: SessionStore,
    /// Per-chat API credentials, consulted by the gateway.
    pub tokens: Arc<TokenRegistry>,
    /// Outbound payments API. The trait seam is what makes flows testable.
    pub api: Arc<dyn PaymentsApi>,
    /// What to do with a button press the current state has no handler for.
    pub mismatch_policy: MismatchPolicy,
}

impl AppState {
    pub fn new(
        api: Arc<dyn PaymentsApi>,
        tokens: Arc<TokenRegistry>,
        mismatch_policy: MismatchPolicy,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            tokens,
            api,
            mismatch_policy,
        }
    }

    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
