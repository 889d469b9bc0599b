//! Central tunables shared across modules.

/// Outbound HTTP timeout applied to every payments API call (seconds).
/// Overridable at startup via `HTTP_TIMEOUT_SECS`.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 12;

/// OTP codes are plain digit strings within this length range.
pub const OTP_MIN_DIGITS: usize = 4;
pub const OTP_MAX_DIGITS: usize = 8;

/// Wallet addresses get a minimum-length check only (no checksum validation).
pub const WALLET_ADDRESS_MIN_LEN: usize = 20;

/// Digits left visible when masking an account number in a confirmation summary.
pub const MASK_VISIBLE_DIGITS: usize = 4;

/// Token-length threshold for the outbound redaction pass: any unbroken run of
/// token characters at least this long is assumed to be a credential.
pub const REDACT_MIN_RUN: usize = 24;

/// Networks offered when the balance listing yields none we can read.
pub const DEFAULT_NETWORKS: &[&str] = &["base", "ethereum", "solana", "polygon"];

/// Transfer history page size.
pub const HISTORY_LIMIT: usize = 10;
