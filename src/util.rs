//! Misc small utilities shared across modules.

use crate::constants::{MASK_VISIBLE_DIGITS, REDACT_MIN_RUN};

/// Mask all but the trailing `MASK_VISIBLE_DIGITS` characters of a sensitive
/// string, e.g. an account number in a confirmation summary.
pub fn mask_tail(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= MASK_VISIBLE_DIGITS {
        return "•".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - MASK_VISIBLE_DIGITS..].iter().collect();
    format!("{}{}", "•".repeat(chars.len() - MASK_VISIBLE_DIGITS), visible)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Replace token-like substrings with `[redacted]` before anything is shown in
/// chat. A run counts as token-like when it is an unbroken stretch of
/// base64url-ish characters of at least `REDACT_MIN_RUN` length containing
/// both a letter and a digit. Emails survive because `@` breaks the run.
pub fn redact_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if is_token_char(c) {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(c);
    }
    flush_run(&mut out, &mut run);
    out
}

fn flush_run(out: &mut String, run: &mut String) {
    if run.is_empty() {
        return;
    }
    let token_like = run.chars().count() >= REDACT_MIN_RUN
        && run.chars().any(|c| c.is_ascii_digit())
        && run.chars().any(|c| c.is_ascii_alphabetic());
    if token_like {
        out.push_str("[redacted]");
    } else {
        out.push_str(run);
    }
    run.clear();
}
