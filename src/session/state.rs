//! The finite set of conversation states a chat can be in.
//!
//! Free-text input is routed solely by the current state; button presses are
//! routed by their action tag together with the state (see `dispatch`).

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// Fresh chat, nothing in progress. The only way out is `/login`.
    #[default]
    Start,
    /// Waiting for the user to type their account email.
    AuthEmail,
    /// OTP requested; waiting for the digit code.
    AuthOtp,
    /// Authenticated and idle.
    MainMenu,
    /// Transfer mode selection shown, waiting for a button press.
    TransferMenu,
    TransferEmail,
    TransferWallet,
    TransferBank,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AuthEmail => "auth_email",
            Self::AuthOtp => "auth_otp",
            Self::MainMenu => "main_menu",
            Self::TransferMenu => "transfer_menu",
            Self::TransferEmail => "transfer_email",
            Self::TransferWallet => "transfer_wallet",
            Self::TransferBank => "transfer_bank",
        }
    }

    /// States in which a cancel button must clear scratch data.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Self::TransferMenu | Self::TransferEmail | Self::TransferWallet | Self::TransferBank
        )
    }
}

impl FromStr for ConversationState {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "auth_email" => Ok(Self::AuthEmail),
            "auth_otp" => Ok(Self::AuthOtp),
            "main_menu" => Ok(Self::MainMenu),
            "transfer_menu" => Ok(Self::TransferMenu),
            "transfer_email" => Ok(Self::TransferEmail),
            "transfer_wallet" => Ok(Self::TransferWallet),
            "transfer_bank" => Ok(Self::TransferBank),
            _ => Err(()),
        }
    }
}
