//! Asynchronous deposit notifications.
//!
//! The subscription handshake with the push channel lives outside this crate;
//! whatever drives it only needs to implement [`DepositSource`] and hand the
//! events to [`forward_deposits`], which formats and delivers them to the
//! chat owning that organization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One incoming deposit on the account's organization, as delivered by the
/// push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEvent {
    pub amount: f64,
    pub asset: String,
    pub network: String,
    pub tx_hash: String,
}

/// External collaborator seam: yields deposit events for one organization
/// until the stream ends.
#[async_trait]
pub trait DepositSource: Send {
    async fn next_event(&mut self) -> Option<DepositEvent>;
}

pub fn format_deposit(event: &DepositEvent) -> String {
    // Hashes arrive from the push channel verbatim, so truncate on a char
    // boundary rather than a byte offset.
    let tx = match event.tx_hash.char_indices().nth(12) {
        Some((cut, _)) => format!("{}…", &event.tx_hash[..cut]),
        None => event.tx_hash.clone(),
    };
    format!(
        "Deposit received: {} {} on {} (tx {tx})",
        event.amount, event.asset, event.network
    )
}

/// Pump a source until it closes, delivering one formatted line per event.
/// `deliver` is the transport side ("send text to chat X").
pub async fn forward_deposits<S, F>(mut source: S, mut deliver: F)
where
    S: DepositSource,
    F: FnMut(String) + Send,
{
    while let Some(event) = source.next_event().await {
        info!(target: "deposits", asset = %event.asset, network = %event.network, "deposit event");
        deliver(format_deposit(&event));
    }
}
