//! Transfer flow accumulator.
//!
//! Collects a variable number of scratch fields per mode (email, wallet, or
//! bank), strictly in sequence, then gates submission behind an explicit
//! confirmation. Scratch data is cleared when a flow starts, when it is
//! canceled, and after submission whether or not the gateway call succeeded,
//! so one flow's partial data can never bleed into the next.

use serde_json::{json, Value};
use tracing::debug;

use super::validate;
use crate::constants::DEFAULT_NETWORKS;
use crate::dispatch::{Menu, Reply};
use crate::gateway::{paths, Method};
use crate::model::AppState;
use crate::session::ConversationState;
use crate::util::mask_tail;

// Scratch keys. Scoped to one flow at a time.
pub const K_RECIPIENT: &str = "recipient_email";
pub const K_ADDRESS: &str = "wallet_address";
pub const K_NETWORK: &str = "network";
pub const K_AMOUNT: &str = "amount";
pub const K_MESSAGE: &str = "message";
pub const K_HOLDER: &str = "bank_holder";
pub const K_ACCOUNT: &str = "bank_account";
pub const K_ROUTING: &str = "bank_routing";
pub const K_BANK: &str = "bank_name";
/// Networks offered to this chat, cached as CSV so a re-prompt doesn't
/// re-fetch balances.
const K_NETWORKS_OFFERED: &str = "_networks_offered";

const PROMPT_AMOUNT: &str = "How much would you like to send?";
const PROMPT_MESSAGE: &str = "Add a message for the recipient, or type `skip`.";

/// `/send` or the Send button: open the mode menu. Starting a new flow
/// clears any prior scratch data.
pub async fn open_menu(app: &AppState, chat_id: &str) -> Reply {
    if !app.sessions.is_authenticated(chat_id).await {
        return Reply::text("You need to sign in first. Use /login.");
    }
    app.sessions.clear_temp_data(chat_id).await;
    app.sessions
        .update_state(chat_id, ConversationState::TransferMenu)
        .await;
    Reply::with_menu("How would you like to send funds?", Menu::Transfer)
}

/// Mode button pressed while the transfer menu is showing.
pub async fn choose_mode(app: &AppState, chat_id: &str, mode_tag: &str) -> Reply {
    use crate::interactions::ids;
    let (state, prompt) = match mode_tag {
        ids::TRANSFER_EMAIL => (
            ConversationState::TransferEmail,
            "What's the recipient's email address?",
        ),
        ids::TRANSFER_WALLET => (
            ConversationState::TransferWallet,
            "Paste the destination wallet address.",
        ),
        ids::TRANSFER_BANK => (
            ConversationState::TransferBank,
            "What's the account holder's full name?",
        ),
        _ => return Reply::with_menu("Pick one of the transfer options below.", Menu::Transfer),
    };
    app.sessions.clear_temp_data(chat_id).await;
    app.sessions.update_state(chat_id, state).await;
    Reply::text(prompt)
}

/// Free text while inside one of the three collecting states.
pub async fn handle_text(
    app: &AppState,
    chat_id: &str,
    state: ConversationState,
    text: &str,
) -> Reply {
    match state {
        ConversationState::TransferEmail => email_text(app, chat_id, text).await,
        ConversationState::TransferWallet => wallet_text(app, chat_id, text).await,
        ConversationState::TransferBank => bank_text(app, chat_id, text).await,
        // Dispatch only routes the three collecting states here.
        _ => Reply::with_menu("Use the buttons below.", Menu::Transfer),
    }
}

async fn email_text(app: &AppState, chat_id: &str, text: &str) -> Reply {
    let temp = app.sessions.get_session(chat_id).await.temp;
    if !temp.contains_key(K_RECIPIENT) {
        if !validate::is_valid_email(text) {
            return Reply::text("That doesn't look like an email address. Try again.");
        }
        app.sessions.set_temp_data(chat_id, K_RECIPIENT, text).await;
        let networks = offer_networks(app, chat_id).await;
        return Reply::with_menu(
            "Which network should the funds move on?",
            Menu::Networks(networks),
        );
    }
    if !temp.contains_key(K_NETWORK) {
        let networks = offered_networks(app, chat_id).await;
        return Reply::with_menu(
            "Pick a network with the buttons below.",
            Menu::Networks(networks),
        );
    }
    if !temp.contains_key(K_AMOUNT) {
        return amount_text(app, chat_id, text, PROMPT_MESSAGE).await;
    }
    if !temp.contains_key(K_MESSAGE) {
        // The literal "skip" token means no message, not the string "skip".
        let message = if text.eq_ignore_ascii_case("skip") { "" } else { text };
        app.sessions.set_temp_data(chat_id, K_MESSAGE, message).await;
        return summary_reply(app, chat_id, ConversationState::TransferEmail).await;
    }
    summary_reply(app, chat_id, ConversationState::TransferEmail).await
}

async fn wallet_text(app: &AppState, chat_id: &str, text: &str) -> Reply {
    let temp = app.sessions.get_session(chat_id).await.temp;
    if !temp.contains_key(K_ADDRESS) {
        if !validate::is_plausible_wallet_address(text) {
            return Reply::text("That address looks too short. Paste the full wallet address.");
        }
        app.sessions.set_temp_data(chat_id, K_ADDRESS, text).await;
        let networks = offer_networks(app, chat_id).await;
        return Reply::with_menu(
            "Which network is that address on?",
            Menu::Networks(networks),
        );
    }
    if !temp.contains_key(K_NETWORK) {
        let networks = offered_networks(app, chat_id).await;
        return Reply::with_menu(
            "Pick a network with the buttons below.",
            Menu::Networks(networks),
        );
    }
    if !temp.contains_key(K_AMOUNT) {
        return amount_then_summary(app, chat_id, text, ConversationState::TransferWallet).await;
    }
    summary_reply(app, chat_id, ConversationState::TransferWallet).await
}

async fn bank_text(app: &AppState, chat_id: &str, text: &str) -> Reply {
    if text.is_empty() {
        return Reply::text("I need a value here — please type it out.");
    }
    let temp = app.sessions.get_session(chat_id).await.temp;
    // Which field is still empty decides what this input means; collection
    // is strictly sequential.
    let sequence = [
        (K_HOLDER, "What's the account number?"),
        (K_ACCOUNT, "And the routing number?"),
        (K_ROUTING, "What's the bank's name?"),
        (K_BANK, PROMPT_AMOUNT),
    ];
    for (key, next_prompt) in sequence {
        if !temp.contains_key(key) {
            app.sessions.set_temp_data(chat_id, key, text).await;
            return Reply::text(next_prompt);
        }
    }
    if !temp.contains_key(K_AMOUNT) {
        return amount_then_summary(app, chat_id, text, ConversationState::TransferBank).await;
    }
    summary_reply(app, chat_id, ConversationState::TransferBank).await
}

/// Shared amount step: reject non-positive or unparsable input without
/// advancing, otherwise store and move on.
async fn amount_text(app: &AppState, chat_id: &str, text: &str, next_prompt: &str) -> Reply {
    let Some(amount) = validate::parse_amount(text) else {
        return Reply::text("The amount needs to be a positive number, e.g. 12.5. Try again.");
    };
    app.sessions
        .set_temp_data(chat_id, K_AMOUNT, &amount.to_string())
        .await;
    Reply::text(next_prompt)
}

async fn amount_then_summary(
    app: &AppState,
    chat_id: &str,
    text: &str,
    state: ConversationState,
) -> Reply {
    let Some(amount) = validate::parse_amount(text) else {
        return Reply::text("The amount needs to be a positive number, e.g. 12.5. Try again.");
    };
    app.sessions
        .set_temp_data(chat_id, K_AMOUNT, &amount.to_string())
        .await;
    summary_reply(app, chat_id, state).await
}

/// Network button press. Collection is strictly sequential, so a network
/// choice arriving before the recipient/address was given is `None`, which
/// dispatch treats like any other mismatched action.
pub async fn choose_network(
    app: &AppState,
    chat_id: &str,
    state: ConversationState,
    network: &str,
) -> Option<Reply> {
    let anchor = match state {
        ConversationState::TransferEmail => K_RECIPIENT,
        ConversationState::TransferWallet => K_ADDRESS,
        _ => return None,
    };
    app.sessions.get_temp_data(chat_id, anchor).await?;
    app.sessions.set_temp_data(chat_id, K_NETWORK, network).await;
    Some(Reply::text(PROMPT_AMOUNT))
}

/// Confirm button: build exactly one outbound request, then clear scratch
/// regardless of the outcome.
pub async fn confirm(app: &AppState, chat_id: &str, state: ConversationState) -> Reply {
    let temp = app.sessions.get_session(chat_id).await.temp;
    let Some((path, payload)) = build_request(state, &temp) else {
        debug!(target: "transfer", chat_id, state = state.as_str(), "confirm pressed before flow was complete");
        return Reply::text("This transfer isn't fully filled in yet. Answer the remaining questions first.");
    };

    let result = app
        .api
        .request(Method::Post, path, Some(payload), chat_id)
        .await;
    app.sessions.clear_temp_data(chat_id).await;
    app.sessions
        .update_state(chat_id, ConversationState::MainMenu)
        .await;
    let text = if result.success {
        format!("Transfer submitted. {}", result.message)
    } else {
        format!("The transfer wasn't completed: {}", result.message)
    };
    Reply::with_menu(text, Menu::Main)
}

/// Cancel button: discard all scratch data and return to the main menu
/// without any network call.
pub async fn cancel(app: &AppState, chat_id: &str) -> Reply {
    app.sessions.clear_temp_data(chat_id).await;
    app.sessions
        .update_state(chat_id, ConversationState::MainMenu)
        .await;
    Reply::with_menu("Transfer canceled. Nothing was sent.", Menu::Main)
}

fn build_request(
    state: ConversationState,
    temp: &std::collections::HashMap<String, String>,
) -> Option<(&'static str, Value)> {
    let get = |key: &str| temp.get(key).filter(|v| !v.is_empty()).cloned();
    let amount: f64 = temp.get(K_AMOUNT)?.parse().ok()?;
    match state {
        ConversationState::TransferEmail => {
            let payload = json!({
                "recipient": get(K_RECIPIENT)?,
                "network": get(K_NETWORK)?,
                "amount": amount,
                // Empty string when the user skipped; the key is always sent.
                "message": temp.get(K_MESSAGE).cloned()?,
            });
            Some((paths::TRANSFER_EMAIL, payload))
        }
        ConversationState::TransferWallet => {
            let payload = json!({
                "address": get(K_ADDRESS)?,
                "network": get(K_NETWORK)?,
                "amount": amount,
            });
            Some((paths::TRANSFER_WALLET, payload))
        }
        ConversationState::TransferBank => {
            let payload = json!({
                "accountHolder": get(K_HOLDER)?,
                "accountNumber": get(K_ACCOUNT)?,
                "routingNumber": get(K_ROUTING)?,
                "bankName": get(K_BANK)?,
                "amount": amount,
            });
            Some((paths::TRANSFER_BANK, payload))
        }
        _ => None,
    }
}

/// Render the mandatory confirmation summary, masking sensitive fields.
async fn summary_reply(app: &AppState, chat_id: &str, state: ConversationState) -> Reply {
    let temp = app.sessions.get_session(chat_id).await.temp;
    let amount = temp.get(K_AMOUNT).cloned().unwrap_or_default();
    let lines = match state {
        ConversationState::TransferEmail => {
            let mut lines = vec![
                format!("To: {}", temp.get(K_RECIPIENT).cloned().unwrap_or_default()),
                format!("Network: {}", temp.get(K_NETWORK).cloned().unwrap_or_default()),
                format!("Amount: {amount}"),
            ];
            match temp.get(K_MESSAGE).map(String::as_str) {
                Some("") | None => lines.push("Message: (none)".to_string()),
                Some(m) => lines.push(format!("Message: {m}")),
            }
            lines
        }
        ConversationState::TransferWallet => vec![
            format!("To address: {}", temp.get(K_ADDRESS).cloned().unwrap_or_default()),
            format!("Network: {}", temp.get(K_NETWORK).cloned().unwrap_or_default()),
            format!("Amount: {amount}"),
        ],
        _ => vec![
            format!("Account holder: {}", temp.get(K_HOLDER).cloned().unwrap_or_default()),
            format!(
                "Account number: {}",
                mask_tail(temp.get(K_ACCOUNT).map(String::as_str).unwrap_or_default())
            ),
            format!(
                "Routing number: {}",
                mask_tail(temp.get(K_ROUTING).map(String::as_str).unwrap_or_default())
            ),
            format!("Bank: {}", temp.get(K_BANK).cloned().unwrap_or_default()),
            format!("Amount: {amount}"),
        ],
    };
    Reply::with_menu(
        format!("Please review:\n{}\n\nConfirm to send.", lines.join("\n")),
        Menu::Confirm,
    )
}

/// Fetch the networks this account can use, falling back to a default list
/// when balances are unreadable. The offered list is cached in scratch for
/// re-prompts.
async fn offer_networks(app: &AppState, chat_id: &str) -> Vec<String> {
    let result = app
        .api
        .request(Method::Get, paths::WALLET_BALANCES, None, chat_id)
        .await;
    let mut networks: Vec<String> = Vec::new();
    if let Some(body) = result.data.filter(|_| result.success) {
        for item in wallet_items(&body) {
            if let Some(net) = item.get("network").and_then(Value::as_str) {
                if !networks.iter().any(|n| n == net) {
                    networks.push(net.to_string());
                }
            }
        }
    }
    if networks.is_empty() {
        networks = DEFAULT_NETWORKS.iter().map(|s| s.to_string()).collect();
    }
    app.sessions
        .set_temp_data(chat_id, K_NETWORKS_OFFERED, &networks.join(","))
        .await;
    networks
}

async fn offered_networks(app: &AppState, chat_id: &str) -> Vec<String> {
    match app.sessions.get_temp_data(chat_id, K_NETWORKS_OFFERED).await {
        Some(csv) if !csv.is_empty() => csv.split(',').map(str::to_string).collect(),
        _ => DEFAULT_NETWORKS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Locate the wallet array wherever this response shape put it.
pub fn wallet_items(body: &Value) -> Vec<&Value> {
    for candidate in [
        body.get("data").and_then(|d| d.get("wallets")),
        body.get("wallets"),
        body.get("data"),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(items) = candidate.as_array() {
            return items.iter().collect();
        }
    }
    Vec::new()
}
