//! Per-chat volatile state: conversation sessions and API credentials.
//!
//! Everything here lives for the process lifetime only. There is no eviction
//! and no persistence; memory grows with distinct chats, which is acceptable
//! for single-process in-memory state.

pub mod state;
pub mod store;
pub mod tokens;

pub use state::ConversationState;
pub use store::{Session, SessionStore};
pub use tokens::TokenRegistry;
