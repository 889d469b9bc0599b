use paymaster_bot::interactions::ids::{
    is_network_choice, is_transfer_mode, parse_network_id, TRANSFER_NETWORK_PREFIX,
};

#[test]
fn parse_network_ok() {
    let id = format!("{TRANSFER_NETWORK_PREFIX}base");
    assert_eq!(parse_network_id(&id), Some("base"));
}

#[test]
fn parse_network_keeps_inner_underscores() {
    let id = format!("{TRANSFER_NETWORK_PREFIX}arbitrum_one");
    assert_eq!(parse_network_id(&id), Some("arbitrum_one"));
}

#[test]
fn parse_network_bad() {
    assert_eq!(parse_network_id("transfer_network_"), None);
    assert_eq!(parse_network_id("transfer_confirm"), None);
    assert_eq!(parse_network_id("network_base"), None);
}

#[test]
fn mode_predicate() {
    assert!(is_transfer_mode("transfer_email"));
    assert!(is_transfer_mode("transfer_wallet"));
    assert!(is_transfer_mode("transfer_bank"));
    assert!(!is_transfer_mode("transfer_cancel"));
    assert!(!is_transfer_mode("menu_send"));
}

#[test]
fn network_predicate() {
    assert!(is_network_choice("transfer_network_base"));
    assert!(!is_network_choice("transfer_bank"));
}
