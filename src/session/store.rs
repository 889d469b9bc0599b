//! In-memory session records, one per chat identity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::state::ConversationState;

/// One chat's conversation record. Cheap to clone; the store hands out
/// snapshots rather than references so handlers never hold the map lock.
#[derive(Debug, Clone)]
pub struct Session {
    pub chat_id: String,
    /// Email supplied during login; kept after authentication for display.
    pub email: Option<String>,
    /// Presence of this field is the de-facto "is authenticated" flag.
    pub organization_id: Option<String>,
    pub state: ConversationState,
    pub last_action: DateTime<Utc>,
    /// Flow-scoped scratch fields (transfer recipient, amount, ...).
    pub temp: HashMap<String, String>,
}

impl Session {
    fn new(chat_id: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            email: None,
            organization_id: None,
            state: ConversationState::Start,
            last_action: Utc::now(),
            temp: HashMap::new(),
        }
    }
}

/// Keyed map of chat id -> session. First access lazily creates a default
/// record, so lookups never fail.
///
/// Concurrent handlers for the *same* chat overwrite rather than merge; the
/// transport serializes per-chat delivery in the common case and the design
/// accepts last-write-wins for the remainder.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the session, creating the default record on
    /// first reference.
    pub async fn get_session(&self, chat_id: &str) -> Session {
        let mut map = self.inner.write().await;
        map.entry(chat_id.to_string())
            .or_insert_with(|| Session::new(chat_id))
            .clone()
    }

    /// Applies `apply` to the (lazily created) record, stamps the
    /// last-action time, and returns the updated snapshot.
    pub async fn set_session<F>(&self, chat_id: &str, apply: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut map = self.inner.write().await;
        let session = map
            .entry(chat_id.to_string())
            .or_insert_with(|| Session::new(chat_id));
        apply(session);
        session.last_action = Utc::now();
        session.clone()
    }

    /// Derived, not separately tracked: any write of the organization id
    /// flips this implicitly.
    pub async fn is_authenticated(&self, chat_id: &str) -> bool {
        self.inner
            .read()
            .await
            .get(chat_id)
            .and_then(|s| s.organization_id.as_deref())
            .is_some_and(|org| !org.is_empty())
    }

    /// Resets to the default record, preserving only the chat id. Used for
    /// logout and for abandoning a flow.
    pub async fn clear_session(&self, chat_id: &str) {
        let mut map = self.inner.write().await;
        map.insert(chat_id.to_string(), Session::new(chat_id));
    }

    pub async fn update_state(&self, chat_id: &str, new_state: ConversationState) {
        self.set_session(chat_id, |s| s.state = new_state).await;
    }

    pub async fn get_state(&self, chat_id: &str) -> ConversationState {
        self.get_session(chat_id).await.state
    }

    pub async fn set_temp_data(&self, chat_id: &str, key: &str, value: &str) {
        self.set_session(chat_id, |s| {
            s.temp.insert(key.to_string(), value.to_string());
        })
        .await;
    }

    pub async fn get_temp_data(&self, chat_id: &str, key: &str) -> Option<String> {
        self.get_session(chat_id).await.temp.get(key).cloned()
    }

    /// Replaces the scratch map with an empty one without touching auth
    /// fields or state.
    pub async fn clear_temp_data(&self, chat_id: &str) {
        self.set_session(chat_id, |s| s.temp.clear()).await;
    }
}
