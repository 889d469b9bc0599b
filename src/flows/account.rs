//! Authenticated account lookups: balances, history, KYC, logout.

use serde_json::Value;

use super::transfer::wallet_items;
use crate::constants::HISTORY_LIMIT;
use crate::dispatch::{Menu, Reply};
use crate::gateway::{envelope, paths, Method};
use crate::model::AppState;

pub async fn balances(app: &AppState, chat_id: &str) -> Reply {
    if !app.sessions.is_authenticated(chat_id).await {
        return Reply::text("You need to sign in first. Use /login.");
    }
    let result = app
        .api
        .request(Method::Get, paths::WALLET_BALANCES, None, chat_id)
        .await;
    if !result.success {
        return Reply::text(result.message);
    }
    let body = result.data.unwrap_or(Value::Null);
    let lines: Vec<String> = wallet_items(&body)
        .into_iter()
        .map(|item| {
            let asset = field(item, "asset").or_else(|| field(item, "currency"));
            let network = field(item, "network");
            let balance = field(item, "balance").or_else(|| field(item, "amount"));
            format!(
                "• {} on {}: {}",
                asset.unwrap_or_else(|| "?".into()),
                network.unwrap_or_else(|| "?".into()),
                balance.unwrap_or_else(|| "?".into()),
            )
        })
        .collect();
    let text = if lines.is_empty() {
        "No wallets found on your account yet.".to_string()
    } else {
        format!("Your balances:\n{}", lines.join("\n"))
    };
    Reply::with_menu(text, Menu::Main)
}

pub async fn history(app: &AppState, chat_id: &str) -> Reply {
    if !app.sessions.is_authenticated(chat_id).await {
        return Reply::text("You need to sign in first. Use /login.");
    }
    let path = format!("{}?limit={}", paths::TRANSFER_HISTORY, HISTORY_LIMIT);
    let result = app.api.request(Method::Get, &path, None, chat_id).await;
    if !result.success {
        return Reply::text(result.message);
    }
    let body = result.data.unwrap_or(Value::Null);
    let lines: Vec<String> = transfer_items(&body)
        .into_iter()
        .map(|item| {
            let amount = field(item, "amount").unwrap_or_else(|| "?".into());
            let asset = field(item, "asset").unwrap_or_default();
            let status = field(item, "status").unwrap_or_else(|| "unknown".into());
            let to = field(item, "recipient")
                .or_else(|| field(item, "address"))
                .unwrap_or_else(|| "?".into());
            format!("• {amount} {asset} → {to} ({status})")
        })
        .collect();
    let text = if lines.is_empty() {
        "No transfers yet.".to_string()
    } else {
        format!("Recent transfers:\n{}", lines.join("\n"))
    };
    Reply::with_menu(text, Menu::Main)
}

/// `/logout` or the logout button, valid from any state: forget the token
/// record and reset the session to its default, keeping only the chat id.
pub async fn logout(app: &AppState, chat_id: &str) -> Reply {
    app.tokens.clear_token(chat_id).await;
    app.sessions.clear_session(chat_id).await;
    Reply::text("You're signed out. Use /login whenever you want back in.")
}

/// Best-effort KYC line for the post-login greeting; `None` when the status
/// can't be read (sign-in proceeds regardless).
pub async fn kyc_line(app: &AppState, chat_id: &str) -> Option<String> {
    let result = app
        .api
        .request(Method::Get, paths::KYC_STATUS, None, chat_id)
        .await;
    if !result.success {
        return None;
    }
    let status = envelope::deep_find(result.data.as_ref()?, "status")?;
    Some(format!("KYC status: {status}"))
}

fn field(item: &Value, name: &str) -> Option<String> {
    match item.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn transfer_items(body: &Value) -> Vec<&Value> {
    for candidate in [
        body.get("data").and_then(|d| d.get("transfers")),
        body.get("transfers"),
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
