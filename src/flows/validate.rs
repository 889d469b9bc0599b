//! Input validation applied before any state transition. A failed check
//! re-prompts without advancing state and without touching the network.

use crate::constants::{OTP_MAX_DIGITS, OTP_MIN_DIGITS, WALLET_ADDRESS_MIN_LEN};

/// Standard two-part local@domain check. Deliberately simple; the upstream
/// API is the real authority on whether an email exists.
pub fn is_valid_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if text.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn is_valid_otp(text: &str) -> bool {
    (OTP_MIN_DIGITS..=OTP_MAX_DIGITS).contains(&text.len())
        && text.chars().all(|c| c.is_ascii_digit())
}

/// Positive finite number or nothing.
pub fn parse_amount(text: &str) -> Option<f64> {
    let amount: f64 = text.trim().parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Minimum-length check only; no checksum. An accepted limitation, not a
/// hidden bug.
pub fn is_plausible_wallet_address(text: &str) -> bool {
    text.len() >= WALLET_ADDRESS_MIN_LEN && !text.chars().any(char::is_whitespace)
}
