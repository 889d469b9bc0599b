//! Response-shape normalization.
//!
//! The upstream API has been observed to answer in several envelope shapes:
//! an explicit `status`/`success` wrapper with tokens nested under
//! `data.tokens.access.token`, a flattened wrapper with `tokens` hoisted to
//! the top level, a bare `{token}` object, and occasionally something with
//! no recognizable marker at all. Candidates are probed in that priority
//! order; the first match wins. When neither a success nor a failure marker
//! is found the outcome is [`Shape::AssumedSuccess`]: the side effect (e.g.
//! an OTP email) usually happened regardless, so treating ambiguity as
//! failure would falsely block the user. The matched shape is carried on the
//! result so callers and tests can see when success was assumed rather than
//! parsed.

use serde_json::Value;

/// Which candidate matcher recognized the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Explicit boolean status, token (if any) under `data.tokens.access`.
    Canonical,
    /// Token fields hoisted to the top level (`tokens.access.token`).
    Flattened,
    /// A bare `{ "token": ... }` / `{ "accessToken": ... }` object.
    BareToken,
    /// Heuristic deep search found a field literally named
    /// `email`/`id`/`token`; last resort before assuming success.
    DeepProbe,
    /// No recognizable success or failure marker; treated as success with a
    /// generic confirmation. Explicit and named so it is testable.
    AssumedSuccess,
}

/// Normalized view of one response body.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub shape: Shape,
    pub ok: bool,
    pub message: Option<String>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_ms: Option<i64>,
    pub email: Option<String>,
    pub organization_id: Option<String>,
}

impl Extracted {
    fn assumed() -> Self {
        Self {
            shape: Shape::AssumedSuccess,
            ok: true,
            message: None,
            token: None,
            refresh_token: None,
            expires_at_ms: None,
            email: None,
            organization_id: None,
        }
    }
}

fn str_at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v str> {
    let mut cur = value;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_str()
}

fn i64_at(value: &Value, path: &[&str]) -> Option<i64> {
    let mut cur = value;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_i64()
}

/// Depth-first search for the first field with the given name holding a
/// string or number.
pub fn deep_find(value: &Value, name: &str) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(v) = map.get(name) {
                match v {
                    Value::String(s) => return Some(s.clone()),
                    Value::Number(n) => return Some(n.to_string()),
                    _ => {}
                }
            }
            map.values().find_map(|v| deep_find(v, name))
        }
        Value::Array(items) => items.iter().find_map(|v| deep_find(v, name)),
        _ => None,
    }
}

fn status_marker(value: &Value) -> Option<bool> {
    if let Some(b) = value.get("status").and_then(Value::as_bool) {
        return Some(b);
    }
    if let Some(b) = value.get("success").and_then(Value::as_bool) {
        return Some(b);
    }
    if let Some(code) = value.get("code").and_then(Value::as_i64) {
        return Some(code < 400);
    }
    if value.get("error").is_some() {
        return Some(false);
    }
    None
}

fn message_of(value: &Value) -> Option<String> {
    for key in ["message", "msg", "detail"] {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            return Some(s.to_string());
        }
    }
    // `error` may itself be the message string.
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn token_paths(value: &Value) -> (Option<(Shape, String)>, Option<String>, Option<i64>) {
    // Canonical nesting first, then flattened, then bare.
    if let Some(t) = str_at(value, &["data", "tokens", "access", "token"]) {
        let refresh = str_at(value, &["data", "tokens", "refresh", "token"]).map(str::to_string);
        let exp = i64_at(value, &["data", "tokens", "access", "expires"]);
        return (Some((Shape::Canonical, t.to_string())), refresh, exp);
    }
    if let Some(t) = str_at(value, &["tokens", "access", "token"]) {
        let refresh = str_at(value, &["tokens", "refresh", "token"]).map(str::to_string);
        let exp = i64_at(value, &["tokens", "access", "expires"]);
        return (Some((Shape::Flattened, t.to_string())), refresh, exp);
    }
    for key in ["token", "accessToken"] {
        if let Some(t) = value.get(key).and_then(Value::as_str) {
            let refresh = value
                .get("refreshToken")
                .and_then(Value::as_str)
                .map(str::to_string);
            let exp = value.get("expiresAt").and_then(Value::as_i64);
            return (Some((Shape::BareToken, t.to_string())), refresh, exp);
        }
    }
    (None, None, None)
}

fn org_id_of(value: &Value) -> Option<String> {
    for path in [
        &["data", "user", "organizationId"][..],
        &["user", "organizationId"][..],
        &["data", "organizationId"][..],
        &["organizationId"][..],
    ] {
        if let Some(s) = str_at(value, path) {
            return Some(s.to_string());
        }
    }
    None
}

/// Probe the candidate shapes in priority order and return the normalized
/// view. Never fails: the worst case is `AssumedSuccess` with nothing
/// extracted.
pub fn parse(value: &Value) -> Extracted {
    if value.is_null() {
        return Extracted::assumed();
    }

    let marker = status_marker(value);
    let (token_match, refresh_token, expires_at_ms) = token_paths(value);
    let message = message_of(value);
    let email = deep_find(value, "email");
    let organization_id = org_id_of(value);

    if let Some(ok) = marker {
        // Explicit envelope; shape named after where the token sat (absent
        // token still counts as canonical since the wrapper was explicit).
        let shape = token_match
            .as_ref()
            .map(|(s, _)| *s)
            .unwrap_or(Shape::Canonical);
        return Extracted {
            shape,
            ok,
            message,
            token: token_match.map(|(_, t)| t),
            refresh_token,
            expires_at_ms,
            email,
            organization_id,
        };
    }

    if let Some((shape, token)) = token_match {
        return Extracted {
            shape,
            ok: true,
            message,
            token: Some(token),
            refresh_token,
            expires_at_ms,
            email,
            organization_id,
        };
    }

    // Last resort before assuming success: any field literally named
    // email/id/token buried somewhere in the body.
    let probed_token = deep_find(value, "token");
    let probed_id = deep_find(value, "id");
    if email.is_some() || probed_id.is_some() || probed_token.is_some() {
        return Extracted {
            shape: Shape::DeepProbe,
            ok: true,
            message,
            token: probed_token,
            refresh_token,
            expires_at_ms,
            email,
            organization_id: organization_id.or(probed_id),
        };
    }

    Extracted {
        message,
        ..Extracted::assumed()
    }
}
