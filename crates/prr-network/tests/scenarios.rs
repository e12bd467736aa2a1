//! # Pricing and Billing Scenarios
//!
//! End-to-end flows through the registry: origination, pricing under each
//! tier, charging, payment and promotion.

use prr_core::{CommunicationId, NetworkConfig, NetworkError, PromotionThresholds, TaxId};
use prr_network::Network;
use prr_tariff::TierKind;

fn network() -> Network {
    let mut net = Network::new(NetworkConfig::default());
    net.register_client("ana", "Ana", TaxId(100)).unwrap();
    net.register_client("rui", "Rui", TaxId(200)).unwrap();
    net.register_terminal("FANCY", "111111", "ana").unwrap();
    net.register_terminal("FANCY", "222222", "rui").unwrap();
    net
}

fn text(len: usize) -> String {
    "x".repeat(len)
}

fn debts(net: &Network, terminal: &str) -> f64 {
    net.terminal(terminal).unwrap().ledger().debts()
}

fn pay_call(net: &mut Network, units: u32) -> CommunicationId {
    let id = net.make_voice_call("111111", "222222").unwrap().unwrap();
    net.end_ongoing_communication("111111", units).unwrap();
    net.perform_payment("111111", id).unwrap();
    id
}

// =========================================================================
// Scenario A: short text, Normal tier, no friendship
// =========================================================================

#[test]
fn normal_short_text_costs_ten() {
    let mut net = network();
    let id = net.send_sms("111111", "222222", &text(40)).unwrap().unwrap();
    assert_eq!(net.communication(id).unwrap().price(), 10.0);
    assert_eq!(debts(&net, "111111"), 10.0);
    assert_eq!(net.client("ana").unwrap().debts(), 10.0);
}

// =========================================================================
// Scenario B: long text, Normal tier
// =========================================================================

#[test]
fn normal_long_text_costs_two_per_character() {
    let mut net = network();
    let id = net.send_sms("111111", "222222", &text(120)).unwrap().unwrap();
    assert_eq!(net.communication(id).unwrap().price(), 240.0);
}

#[test]
fn friendship_does_not_discount_text() {
    let mut net = network();
    net.add_friend("111111", "222222").unwrap();
    let id = net.send_sms("111111", "222222", &text(40)).unwrap().unwrap();
    assert_eq!(net.communication(id).unwrap().price(), 10.0);
}

// =========================================================================
// Scenario C: voice call, end, pay
// =========================================================================

#[test]
fn voice_call_is_charged_then_paid() {
    let mut net = network();
    let id = net.make_voice_call("111111", "222222").unwrap().unwrap();
    assert_eq!(net.end_ongoing_communication("111111", 2).unwrap(), 40.0);

    let call = net.communication(id).unwrap();
    assert_eq!(call.price(), 40.0);
    assert!(!call.is_paid());
    assert_eq!(debts(&net, "111111"), 40.0);

    net.perform_payment("111111", id).unwrap();
    assert!(net.communication(id).unwrap().is_paid());
    let ledger = *net.terminal("111111").unwrap().ledger();
    assert_eq!((ledger.payments(), ledger.debts()), (40.0, 0.0));
    assert_eq!(net.client("ana").unwrap().balance(), 40.0);
}

#[test]
fn friend_halves_call_price_from_sender_side_only() {
    let mut net = network();
    net.add_friend("222222", "111111").unwrap();
    net.make_voice_call("111111", "222222").unwrap();
    assert_eq!(net.end_ongoing_communication("111111", 2).unwrap(), 40.0);

    net.add_friend("111111", "222222").unwrap();
    net.make_voice_call("111111", "222222").unwrap();
    assert_eq!(net.end_ongoing_communication("111111", 2).unwrap(), 20.0);
}

#[test]
fn payment_by_receiver_is_rejected() {
    let mut net = network();
    let id = net.make_voice_call("111111", "222222").unwrap().unwrap();
    net.end_ongoing_communication("111111", 1).unwrap();
    assert!(matches!(
        net.perform_payment("222222", id),
        Err(NetworkError::InvalidCommunication(_))
    ));
    assert!(!net.communication(id).unwrap().is_paid());
}

#[test]
fn double_payment_is_rejected() {
    let mut net = network();
    let id = pay_call(&mut net, 1);
    assert!(matches!(
        net.perform_payment("111111", id),
        Err(NetworkError::InvalidCommunication(_))
    ));
    assert_eq!(net.client("ana").unwrap().payments(), 20.0);
}

// =========================================================================
// Scenario D: promotion changes future pricing
// =========================================================================

#[test]
fn payments_above_500_promote_to_gold() {
    let mut net = network();
    let before = net.send_sms("111111", "222222", &text(80)).unwrap().unwrap();
    assert_eq!(net.communication(before).unwrap().price(), 16.0);

    // 26 units × 20 = 520; balance 520 − 16 = 504 > 500.
    pay_call(&mut net, 26);
    assert_eq!(net.client("ana").unwrap().tier_kind(), TierKind::Gold);

    let after = net.send_sms("111111", "222222", &text(80)).unwrap().unwrap();
    assert_eq!(net.communication(after).unwrap().price(), 10.0);
}

#[test]
fn gold_to_platinum_uses_configured_threshold() {
    let config = NetworkConfig {
        promotion: PromotionThresholds {
            gold: 100.0,
            platinum: 300.0,
        },
    };
    let mut net = Network::new(config);
    net.register_client("ana", "Ana", TaxId(1)).unwrap();
    net.register_client("rui", "Rui", TaxId(2)).unwrap();
    net.register_terminal("BASIC", "111111", "ana").unwrap();
    net.register_terminal("BASIC", "222222", "rui").unwrap();

    pay_call(&mut net, 6); // Normal: 120
    assert_eq!(net.client("ana").unwrap().tier_kind(), TierKind::Gold);
    pay_call(&mut net, 20); // Gold: 200, balance 320
    assert_eq!(net.client("ana").unwrap().tier_kind(), TierKind::Platinum);

    let id = net.send_sms("111111", "222222", &text(10)).unwrap().unwrap();
    assert_eq!(net.communication(id).unwrap().price(), 0.0);
}

#[test]
fn one_payment_promotes_one_step() {
    let mut net = network();
    pay_call(&mut net, 200); // 4000 paid
    assert_eq!(net.client("ana").unwrap().tier_kind(), TierKind::Gold);
    pay_call(&mut net, 1);
    assert_eq!(net.client("ana").unwrap().tier_kind(), TierKind::Platinum);
}

// =========================================================================
// Scenario E: text to an Off terminal
// =========================================================================

#[test]
fn text_to_off_terminal_changes_nothing() {
    let mut net = network();
    net.turn_off("222222").unwrap();
    let err = net.send_sms("111111", "222222", &text(40)).unwrap_err();
    assert!(matches!(err, NetworkError::UnreachableOffTerminal(_)));
    assert_eq!(net.communications().count(), 0);
    assert_eq!(debts(&net, "111111"), 0.0);
    assert_eq!(debts(&net, "222222"), 0.0);
    assert!(net.terminal("111111").unwrap().is_unused());
}

// =========================================================================
// Silent no-ops
// =========================================================================

#[test]
fn ending_without_a_call_returns_zero() {
    let mut net = network();
    assert_eq!(net.end_ongoing_communication("111111", 5).unwrap(), 0.0);
    assert_eq!(debts(&net, "111111"), 0.0);
}

#[test]
fn receiver_ending_a_call_changes_nothing() {
    let mut net = network();
    let id = net.make_video_call("111111", "222222").unwrap().unwrap();
    assert_eq!(net.end_ongoing_communication("222222", 5).unwrap(), 0.0);
    assert!(net.communication(id).unwrap().is_ongoing());
    assert_eq!(debts(&net, "222222"), 0.0);
}

#[test]
fn unknown_receiver_fails_without_state() {
    let mut net = network();
    assert!(matches!(
        net.send_sms("111111", "999999", "hi"),
        Err(NetworkError::UnknownTerminalKey(_))
    ));
    assert_eq!(net.communications().count(), 0);
}
