//! Centralized custom_id string constants for interaction components.
//! Consolidating here reduces typos and enables future refactors.

// Main menu actions
pub const MENU_SEND: &str = "menu_send";
pub const MENU_BALANCE: &str = "menu_balance";
pub const MENU_HISTORY: &str = "menu_history";
pub const MENU_LOGOUT: &str = "menu_logout";

// Transfer mode selection
pub const TRANSFER_EMAIL: &str = "transfer_email";
pub const TRANSFER_WALLET: &str = "transfer_wallet";
pub const TRANSFER_BANK: &str = "transfer_bank";

// Mid-flow actions
pub const TRANSFER_NETWORK_PREFIX: &str = "transfer_network_"; // followed by network key
pub const TRANSFER_CONFIRM: &str = "transfer_confirm";
pub const TRANSFER_CANCEL: &str = "transfer_cancel";

// Utility predicates
pub fn is_transfer_mode(id: &str) -> bool {
    matches!(id, TRANSFER_EMAIL | TRANSFER_WALLET | TRANSFER_BANK)
}

pub fn is_network_choice(id: &str) -> bool {
    id.starts_with(TRANSFER_NETWORK_PREFIX)
}

/// Parse a network selection custom_id into the network key.
/// Expected form: `transfer_network_<network>`.
pub fn parse_network_id(id: &str) -> Option<&str> {
    let rest = id.strip_prefix(TRANSFER_NETWORK_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest)
}
