//! Normalized event dispatch.
//!
//! Every inbound event is converted to either [`Event::FreeText`] or
//! [`Event::Action`] before routing. Free text is routed by the chat's
//! current conversation state; actions are routed by the (state, tag) pair
//! in one match, so "no handler for this combination" is an explicit branch
//! governed by [`MismatchPolicy`] rather than a silent fallthrough.

use std::str::FromStr;

use tracing::debug;

use crate::flows::{account, login, transfer};
use crate::interactions::ids;
use crate::model::AppState;
use crate::session::ConversationState;

/// One normalized inbound event for a chat.
#[derive(Debug, Clone)]
pub enum Event {
    /// A plain text message, interpreted against the current state.
    FreeText(String),
    /// A button press, carrying the component's action tag.
    Action(String),
}

/// What a handler wants rendered under its reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Main,
    Transfer,
    Networks(Vec<String>),
    Confirm,
}

/// Transport-agnostic reply; the serenity layer turns `menu` into action
/// rows. Every populated reply reaches the chat.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub menu: Option<Menu>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }

    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            menu: Some(menu),
        }
    }
}

/// What to do when an action arrives in a state that has no handler for it
/// (e.g. a stale button pressed mid-bank-transfer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Drop the event (logged at debug).
    #[default]
    Ignore,
    /// Abandon the current flow and send the user back to the main menu.
    CancelAndRedirect,
}

impl FromStr for MismatchPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "cancel" | "cancel_and_redirect" => Ok(Self::CancelAndRedirect),
            _ => Err(()),
        }
    }
}

const HELP_TEXT: &str = "Commands:\n\
    /login — sign in with your account email\n\
    /send — start a transfer (email, wallet, or bank)\n\
    /balance — list your wallet balances\n\
    /history — recent transfers\n\
    /logout — sign out and forget this session\n\
    /help — this message";

/// Route one event for one chat. `None` means the event was deliberately
/// dropped (mismatch policy `Ignore`); every other path produces a reply.
pub async fn dispatch(app: &AppState, chat_id: &str, event: Event) -> Option<Reply> {
    match event {
        Event::FreeText(text) => Some(free_text(app, chat_id, text.trim()).await),
        Event::Action(tag) => action(app, chat_id, &tag).await,
    }
}

async fn free_text(app: &AppState, chat_id: &str, text: &str) -> Reply {
    if let Some(command) = text.strip_prefix('/') {
        return command_input(app, chat_id, command).await;
    }
    let state = app.sessions.get_state(chat_id).await;
    match state {
        ConversationState::Start => {
            Reply::text("Welcome! Use /login to connect your payments account.")
        }
        ConversationState::AuthEmail => login::handle_email(app, chat_id, text).await,
        ConversationState::AuthOtp => login::handle_otp(app, chat_id, text).await,
        ConversationState::MainMenu => Reply::with_menu(
            "Pick an option below, or use /help for commands.",
            Menu::Main,
        ),
        ConversationState::TransferMenu => Reply::with_menu(
            "Choose how you want to send funds using the buttons.",
            Menu::Transfer,
        ),
        ConversationState::TransferEmail
        | ConversationState::TransferWallet
        | ConversationState::TransferBank => transfer::handle_text(app, chat_id, state, text).await,
    }
}

async fn command_input(app: &AppState, chat_id: &str, command: &str) -> Reply {
    let name = command.split_whitespace().next().unwrap_or("");
    match name {
        "login" => login::begin(app, chat_id).await,
        "send" => transfer::open_menu(app, chat_id).await,
        "balance" | "balances" => account::balances(app, chat_id).await,
        "history" => account::history(app, chat_id).await,
        "logout" => account::logout(app, chat_id).await,
        "help" | "start" => Reply::text(HELP_TEXT),
        _ => Reply::text("Unknown command. Use /help to see what I can do."),
    }
}

async fn action(app: &AppState, chat_id: &str, tag: &str) -> Option<Reply> {
    let state = app.sessions.get_state(chat_id).await;

    // Logout is reachable from any state, like the /logout command.
    if tag == ids::MENU_LOGOUT {
        return Some(account::logout(app, chat_id).await);
    }
    // Cancel applies anywhere inside a transfer flow.
    if tag == ids::TRANSFER_CANCEL && state.is_transfer() {
        return Some(transfer::cancel(app, chat_id).await);
    }

    match (state, tag) {
        (ConversationState::MainMenu, ids::MENU_SEND) => {
            Some(transfer::open_menu(app, chat_id).await)
        }
        (ConversationState::MainMenu, ids::MENU_BALANCE) => {
            Some(account::balances(app, chat_id).await)
        }
        (ConversationState::MainMenu, ids::MENU_HISTORY) => {
            Some(account::history(app, chat_id).await)
        }
        (ConversationState::TransferMenu, mode) if ids::is_transfer_mode(mode) => {
            Some(transfer::choose_mode(app, chat_id, mode).await)
        }
        (ConversationState::TransferEmail | ConversationState::TransferWallet, choice)
            if ids::is_network_choice(choice) =>
        {
            let network = ids::parse_network_id(choice)?;
            match transfer::choose_network(app, chat_id, state, network).await {
                Some(reply) => Some(reply),
                None => mismatch(app, chat_id, state, choice).await,
            }
        }
        (
            ConversationState::TransferEmail
            | ConversationState::TransferWallet
            | ConversationState::TransferBank,
            ids::TRANSFER_CONFIRM,
        ) => Some(transfer::confirm(app, chat_id, state).await),
        (state, tag) => mismatch(app, chat_id, state, tag).await,
    }
}

async fn mismatch(
    app: &AppState,
    chat_id: &str,
    state: ConversationState,
    tag: &str,
) -> Option<Reply> {
    debug!(
        target: "dispatch",
        chat_id,
        state = state.as_str(),
        tag,
        policy = ?app.mismatch_policy,
        "no handler for action in this state"
    );
    match app.mismatch_policy {
        MismatchPolicy::Ignore => None,
        MismatchPolicy::CancelAndRedirect => {
            app.sessions.clear_temp_data(chat_id).await;
            app.sessions
                .update_state(chat_id, ConversationState::MainMenu)
                .await;
            Some(Reply::with_menu(
                "That action isn't available right now, so I've taken you back to the main menu.",
                Menu::Main,
            ))
        }
    }
}
