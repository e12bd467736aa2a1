//! # Client Tier State Machine
//!
//! A client's billing level and the accounts attached to it.
//!
//! ## States
//!
//! ```text
//! Normal ──balance > gold──▶ Gold ──balance > platinum──▶ Platinum
//! ```
//!
//! The check runs after every operation that could complete a payment and
//! is told whether one did. Without a completed payment nothing happens.
//! A promotion replaces the tier with a new value that keeps the ledger
//! and tariff plan and restarts the consecutive-communication counters.
//! There is no demotion: the tier kind never decreases.

use serde::{Deserialize, Serialize};

use prr_core::{Ledger, PromotionThresholds};
use prr_tariff::{CommunicationKind, PlanId, TierKind};

/// A client's billing tier with its ledger, counters and plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    kind: TierKind,
    ledger: Ledger,
    consecutive_text: u32,
    consecutive_video: u32,
    plan: PlanId,
}

impl Default for Tier {
    fn default() -> Self {
        Self::new(PlanId::default())
    }
}

impl Tier {
    /// A fresh Normal tier on `plan` with an empty ledger.
    pub fn new(plan: PlanId) -> Self {
        Self {
            kind: TierKind::Normal,
            ledger: Ledger::default(),
            consecutive_text: 0,
            consecutive_video: 0,
            plan,
        }
    }

    /// The tier level.
    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// The client's ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// `payments - debts`.
    pub fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    /// Texts sent in a row.
    pub fn consecutive_text(&self) -> u32 {
        self.consecutive_text
    }

    /// Video calls made in a row.
    pub fn consecutive_video(&self) -> u32 {
        self.consecutive_video
    }

    /// The tariff plan.
    pub fn plan(&self) -> PlanId {
        self.plan
    }

    /// Apply a signed ledger delta (see [`Ledger::apply`]).
    pub fn apply(&mut self, delta: f64) {
        self.ledger.apply(delta);
    }

    /// Count an originated communication.
    ///
    /// Text and video extend their own streak and break the other; voice
    /// breaks both.
    pub fn record(&mut self, kind: CommunicationKind) {
        match kind {
            CommunicationKind::Text => {
                self.consecutive_video = 0;
                self.consecutive_text += 1;
            }
            CommunicationKind::Video => {
                self.consecutive_text = 0;
                self.consecutive_video += 1;
            }
            CommunicationKind::Voice => {
                self.consecutive_text = 0;
                self.consecutive_video = 0;
            }
        }
    }

    /// Price a communication under this tier's plan.
    pub fn price(&self, kind: CommunicationKind, units: u32, friends: bool) -> f64 {
        self.plan.plan().price(self.kind, kind, units, friends)
    }

    /// Balance that must be exceeded to leave this tier, if any.
    pub fn promotion_threshold(&self, thresholds: &PromotionThresholds) -> Option<f64> {
        match self.kind {
            TierKind::Normal => Some(thresholds.gold),
            TierKind::Gold => Some(thresholds.platinum),
            TierKind::Platinum => None,
        }
    }

    /// The tier that replaces this one, if a promotion is due.
    pub fn check_promotion(
        &self,
        payment_completed: bool,
        thresholds: &PromotionThresholds,
    ) -> Option<Tier> {
        if !payment_completed {
            return None;
        }
        let threshold = self.promotion_threshold(thresholds)?;
        if self.balance() > threshold {
            self.promoted()
        } else {
            None
        }
    }

    fn promoted(&self) -> Option<Tier> {
        Some(Tier {
            kind: self.kind.next()?,
            ledger: self.ledger,
            consecutive_text: 0,
            consecutive_video: 0,
            plan: self.plan,
        })
    }
}
