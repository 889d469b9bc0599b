//! Deposit notification seam: formatting and source pumping.

use async_trait::async_trait;
use paymaster_bot::flows::deposits::{format_deposit, forward_deposits, DepositEvent, DepositSource};

struct VecSource(Vec<DepositEvent>);

#[async_trait]
impl DepositSource for VecSource {
    async fn next_event(&mut self) -> Option<DepositEvent> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }
}

fn event(amount: f64, asset: &str) -> DepositEvent {
    DepositEvent {
        amount,
        asset: asset.into(),
        network: "base".into(),
        tx_hash: "0xdeadbeefcafe0123456789".into(),
    }
}

#[test]
fn formatting_truncates_the_hash() {
    let line = format_deposit(&event(25.0, "USDC"));
    assert!(line.contains("25 USDC on base"));
    assert!(line.contains("0xdeadbeefca…"));
    assert!(!line.contains("0123456789"));
}

#[test]
fn truncation_respects_char_boundaries() {
    let mut e = event(3.0, "USDC");
    e.tx_hash = "0xdeadbeefcérest".into();
    let line = format_deposit(&e);
    assert!(line.contains("0xdeadbeefcé…"));
    assert!(!line.contains("rest"));
}

#[test]
fn short_hashes_are_kept_whole() {
    let mut e = event(1.0, "ETH");
    e.tx_hash = "0xabc".into();
    assert!(format_deposit(&e).contains("(tx 0xabc)"));
}

#[tokio::test]
async fn forward_delivers_each_event_in_order() {
    let source = VecSource(vec![event(1.0, "ETH"), event(2.0, "USDC")]);
    let mut delivered = Vec::new();
    forward_deposits(source, |line| delivered.push(line)).await;
    assert_eq!(delivered.len(), 2);
    assert!(delivered[0].contains("1 ETH"));
    assert!(delivered[1].contains("2 USDC"));
}
