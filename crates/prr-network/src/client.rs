//! # Clients
//!
//! A client owns terminals, holds a [`Tier`] and receives notifications.
//! All mutation goes through [`crate::Network`]; the mutators here are
//! crate-private.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use prr_core::{ClientId, PromotionThresholds, TaxId, TerminalId};
use prr_state::{DeliveryMethod, Inbox, Notification, Tier};
use prr_tariff::{CommunicationKind, TierKind};

/// A registered client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    name: String,
    tax_id: TaxId,
    terminals: BTreeSet<TerminalId>,
    tier: Tier,
    notifications_enabled: bool,
    inbox: Inbox,
    delivery: DeliveryMethod,
}

impl Client {
    /// A Normal-tier client with notifications enabled and no terminals.
    pub fn new(id: ClientId, name: impl Into<String>, tax_id: TaxId) -> Self {
        Self {
            id,
            name: name.into(),
            tax_id,
            terminals: BTreeSet::new(),
            tier: Tier::default(),
            notifications_enabled: true,
            inbox: Inbox::default(),
            delivery: DeliveryMethod::default(),
        }
    }

    /// Client key.
    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tax number.
    pub fn tax_id(&self) -> TaxId {
        self.tax_id
    }

    /// Owned terminals, ordered by key.
    pub fn terminals(&self) -> &BTreeSet<TerminalId> {
        &self.terminals
    }

    /// Whether the client owns `terminal`.
    pub fn owns(&self, terminal: &TerminalId) -> bool {
        self.terminals.contains(terminal)
    }

    /// Billing tier.
    pub fn tier(&self) -> &Tier {
        &self.tier
    }

    /// Billing tier level.
    pub fn tier_kind(&self) -> TierKind {
        self.tier.kind()
    }

    /// Cumulative payments over all owned terminals.
    pub fn payments(&self) -> f64 {
        self.tier.ledger().payments()
    }

    /// Outstanding debts over all owned terminals.
    pub fn debts(&self) -> f64 {
        self.tier.ledger().debts()
    }

    /// `payments - debts`.
    pub fn balance(&self) -> f64 {
        self.tier.balance()
    }

    /// Whether notifications are delivered.
    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// How notifications are delivered.
    pub fn delivery_method(&self) -> DeliveryMethod {
        self.delivery
    }

    /// Unread notifications.
    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    /// Price a communication this client originates.
    pub fn price(&self, kind: CommunicationKind, units: u32, friends: bool) -> f64 {
        self.tier.price(kind, units, friends)
    }

    pub(crate) fn add_terminal(&mut self, terminal: TerminalId) {
        self.terminals.insert(terminal);
    }

    pub(crate) fn apply(&mut self, delta: f64) {
        self.tier.apply(delta);
    }

    pub(crate) fn record(&mut self, kind: CommunicationKind) {
        self.tier.record(kind);
    }

    /// Replace the tier if a promotion is due. Returns the new level.
    pub(crate) fn check_promotion(
        &mut self,
        payment_completed: bool,
        thresholds: &PromotionThresholds,
    ) -> Option<TierKind> {
        let next = self.tier.check_promotion(payment_completed, thresholds)?;
        self.tier = next;
        Some(self.tier.kind())
    }

    /// Returns whether the flag changed.
    pub(crate) fn set_notifications_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.notifications_enabled != enabled;
        self.notifications_enabled = enabled;
        changed
    }

    pub(crate) fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.delivery = method;
    }

    /// Deliver through the client's method if notifications are enabled.
    pub(crate) fn notify(&mut self, notification: Notification) {
        if self.notifications_enabled {
            self.delivery.deliver(&self.id, &mut self.inbox, notification);
        }
    }

    pub(crate) fn read_notifications(&mut self) -> Vec<Notification> {
        self.inbox.drain()
    }
}
