//! Token registry contract: independent setters, atomic clears.

use paymaster_bot::session::TokenRegistry;

#[tokio::test]
async fn token_without_refresh_is_fine() {
    let reg = TokenRegistry::new();
    reg.set_token("chat-1", "abc").await;
    assert_eq!(reg.get_token("chat-1").await.as_deref(), Some("abc"));
    assert!(reg.get_refresh_token("chat-1").await.is_none());
    assert!(reg.get_expiry("chat-1").await.is_none());
}

#[tokio::test]
async fn refresh_token_without_access_token_is_fine() {
    let reg = TokenRegistry::new();
    reg.set_refresh_token("chat-1", "r-1").await;
    assert!(reg.get_token("chat-1").await.is_none());
    assert_eq!(
        reg.get_refresh_token("chat-1").await.as_deref(),
        Some("r-1")
    );
}

#[tokio::test]
async fn unknown_or_empty_chat_id_yields_none() {
    let reg = TokenRegistry::new();
    assert!(reg.get_token("never-seen").await.is_none());
    assert!(reg.get_token("").await.is_none());
    assert!(reg.get_refresh_token("").await.is_none());
}

#[tokio::test]
async fn clear_removes_all_three_fields() {
    let reg = TokenRegistry::new();
    reg.set_token("chat-1", "abc").await;
    reg.set_refresh_token("chat-1", "r-1").await;
    reg.set_expiry("chat-1", 1_700_000_000_000).await;

    reg.clear_token("chat-1").await;

    assert!(reg.get_token("chat-1").await.is_none());
    assert!(reg.get_refresh_token("chat-1").await.is_none());
    assert!(reg.get_expiry("chat-1").await.is_none());
}

#[tokio::test]
async fn setters_overwrite_in_place() {
    let reg = TokenRegistry::new();
    reg.set_token("chat-1", "old").await;
    reg.set_refresh_token("chat-1", "r-1").await;
    reg.set_token("chat-1", "new").await;
    // Replacing the access token leaves the refresh token alone.
    assert_eq!(reg.get_token("chat-1").await.as_deref(), Some("new"));
    assert_eq!(
        reg.get_refresh_token("chat-1").await.as_deref(),
        Some("r-1")
    );
}
