//! Conversation flows: login, transfers, account lookups, deposit events.
//!
//! Flow functions take the shared [`crate::model::AppState`] plus a chat id
//! and return a transport-agnostic [`crate::dispatch::Reply`]; the serenity
//! layer never appears here, which keeps every flow testable with a mocked
//! payments API.

pub mod account;
pub mod deposits;
pub mod login;
pub mod transfer;
pub mod validate;
