//! Response-shape probing: each candidate matcher, in priority order, plus
//! the named assume-success fallback.

use paymaster_bot::gateway::envelope::{parse, Shape};
use serde_json::json;

#[test]
fn canonical_envelope_with_nested_token() {
    let body = json!({
        "status": true,
        "message": "verified",
        "data": {
            "tokens": {
                "access": { "token": "abc", "expires": 1_700_000_000_000_i64 },
                "refresh": { "token": "r-1" }
            },
            "user": { "email": "user@example.com", "organizationId": "org-9" }
        }
    });
    let ex = parse(&body);
    assert_eq!(ex.shape, Shape::Canonical);
    assert!(ex.ok);
    assert_eq!(ex.token.as_deref(), Some("abc"));
    assert_eq!(ex.refresh_token.as_deref(), Some("r-1"));
    assert_eq!(ex.expires_at_ms, Some(1_700_000_000_000));
    assert_eq!(ex.email.as_deref(), Some("user@example.com"));
    assert_eq!(ex.organization_id.as_deref(), Some("org-9"));
}

#[test]
fn canonical_envelope_failure() {
    let ex = parse(&json!({ "status": false, "message": "invalid otp" }));
    assert!(!ex.ok);
    assert_eq!(ex.message.as_deref(), Some("invalid otp"));
    assert!(ex.token.is_none());
}

#[test]
fn success_flag_variant_counts_as_explicit() {
    let ex = parse(&json!({ "success": true, "message": "sent" }));
    assert!(ex.ok);
    assert_eq!(ex.shape, Shape::Canonical);
}

#[test]
fn numeric_code_is_a_status_marker() {
    assert!(!parse(&json!({ "code": 401, "message": "expired" })).ok);
    assert!(parse(&json!({ "code": 200 })).ok);
}

#[test]
fn error_field_means_failure() {
    let ex = parse(&json!({ "error": "something broke" }));
    assert!(!ex.ok);
    assert_eq!(ex.message.as_deref(), Some("something broke"));
}

#[test]
fn flattened_envelope_token_hoisted() {
    let body = json!({
        "tokens": { "access": { "token": "flat-token" }, "refresh": { "token": "flat-r" } }
    });
    let ex = parse(&body);
    assert_eq!(ex.shape, Shape::Flattened);
    assert!(ex.ok);
    assert_eq!(ex.token.as_deref(), Some("flat-token"));
    assert_eq!(ex.refresh_token.as_deref(), Some("flat-r"));
}

#[test]
fn bare_token_object() {
    let ex = parse(&json!({ "token": "bare" }));
    assert_eq!(ex.shape, Shape::BareToken);
    assert!(ex.ok);
    assert_eq!(ex.token.as_deref(), Some("bare"));

    let ex = parse(&json!({ "accessToken": "bare2", "refreshToken": "r2" }));
    assert_eq!(ex.shape, Shape::BareToken);
    assert_eq!(ex.token.as_deref(), Some("bare2"));
    assert_eq!(ex.refresh_token.as_deref(), Some("r2"));
}

#[test]
fn deep_probe_finds_buried_fields() {
    let body = json!({
        "weird": { "wrapper": { "email": "x@y.co", "id": "org-5" } }
    });
    let ex = parse(&body);
    assert_eq!(ex.shape, Shape::DeepProbe);
    assert!(ex.ok);
    assert_eq!(ex.email.as_deref(), Some("x@y.co"));
    assert_eq!(ex.organization_id.as_deref(), Some("org-5"));
}

#[test]
fn ambiguous_body_is_assumed_success() {
    let ex = parse(&json!({ "something": "unrelated" }));
    assert_eq!(ex.shape, Shape::AssumedSuccess);
    assert!(ex.ok);
    assert!(ex.token.is_none());

    let ex = parse(&serde_json::Value::Null);
    assert_eq!(ex.shape, Shape::AssumedSuccess);
    assert!(ex.ok);
}

#[test]
fn explicit_marker_wins_over_deep_probe() {
    // A failure marker must not be overridden by an id buried in the body.
    let body = json!({ "status": false, "data": { "id": "org-1" } });
    let ex = parse(&body);
    assert!(!ex.ok);
}
