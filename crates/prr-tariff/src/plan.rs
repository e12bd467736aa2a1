//! # Tariff Plans
//!
//! A plan fills the nine cells of the `tier × kind` matrix with a [`Rate`].
//! The matrix is data: [`BasePlan`] is a `const` table, and the pricing of
//! a cell is [`Rate::price`].
//!
//! ## Base plan
//!
//! | Tier     | Text                              | Voice     | Video     |
//! |----------|-----------------------------------|-----------|-----------|
//! | Normal   | <50: 10, <100: 16, else 2/unit    | 20/unit   | 30/unit   |
//! | Gold     | <100: 10, else 2/unit             | 10/unit   | 20/unit   |
//! | Platinum | <50: 0, else 4                    | 10/unit   | 10/unit   |
//!
//! Interactive cells are halved when the receiver is a friend of the
//! sender. Text cells ignore friendship.

use serde::{Deserialize, Serialize};

use crate::kind::{CommunicationKind, TierKind};

/// Factor applied to per-unit rates between friends.
pub const FRIEND_DISCOUNT: f64 = 0.5;

/// A flat price for every unit count strictly below `below`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive upper bound on units.
    pub below: u32,
    /// Flat price inside the band.
    pub price: f64,
}

/// Pricing once units leave the last band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Beyond {
    /// One flat price regardless of units.
    Flat(f64),
    /// A price per unit.
    PerUnit(f64),
}

/// How one matrix cell turns units into a price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// Flat bands checked in order, then a fallback. Friendship is ignored.
    Banded {
        /// Bands in increasing `below` order.
        bands: &'static [Band],
        /// Pricing past the last band.
        beyond: Beyond,
    },
    /// A price per unit, discounted between friends.
    PerUnit(f64),
}

impl Rate {
    /// Price `units` under this rate. Never negative.
    pub fn price(&self, units: u32, friends: bool) -> f64 {
        let raw = match self {
            Rate::Banded { bands, beyond } => {
                match bands.iter().find(|band| units < band.below) {
                    Some(band) => band.price,
                    None => match beyond {
                        Beyond::Flat(price) => *price,
                        Beyond::PerUnit(per_unit) => per_unit * f64::from(units),
                    },
                }
            }
            Rate::PerUnit(per_unit) => {
                let factor = if friends { FRIEND_DISCOUNT } else { 1.0 };
                per_unit * f64::from(units) * factor
            }
        };
        raw.max(0.0)
    }
}

/// The pricing contract every plan implements.
///
/// Implementors only provide [`TariffPlan::rate`]; the query itself is
/// shared so that all plans agree on the non-negativity guarantee.
pub trait TariffPlan: std::fmt::Debug + Send + Sync {
    /// Canonical plan name.
    fn name(&self) -> &'static str;

    /// The rate of one matrix cell.
    fn rate(&self, tier: TierKind, kind: CommunicationKind) -> Rate;

    /// Price a communication of `kind` with `units` for a client in `tier`.
    /// `friends` is whether the receiver is a friend of the sender.
    fn price(&self, tier: TierKind, kind: CommunicationKind, units: u32, friends: bool) -> f64 {
        self.rate(tier, kind).price(units, friends)
    }
}

const NORMAL_TEXT_BANDS: &[Band] = &[
    Band { below: 50, price: 10.0 },
    Band { below: 100, price: 16.0 },
];

const GOLD_TEXT_BANDS: &[Band] = &[Band { below: 100, price: 10.0 }];

const PLATINUM_TEXT_BANDS: &[Band] = &[Band { below: 50, price: 0.0 }];

/// Base plan matrix, indexed `[tier][kind]`.
const BASE_MATRIX: [[Rate; 3]; 3] = [
    // Normal
    [
        Rate::Banded { bands: NORMAL_TEXT_BANDS, beyond: Beyond::PerUnit(2.0) },
        Rate::PerUnit(20.0),
        Rate::PerUnit(30.0),
    ],
    // Gold
    [
        Rate::Banded { bands: GOLD_TEXT_BANDS, beyond: Beyond::PerUnit(2.0) },
        Rate::PerUnit(10.0),
        Rate::PerUnit(20.0),
    ],
    // Platinum
    [
        Rate::Banded { bands: PLATINUM_TEXT_BANDS, beyond: Beyond::Flat(4.0) },
        Rate::PerUnit(10.0),
        Rate::PerUnit(10.0),
    ],
];

/// The plan every client starts on.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePlan;

impl TariffPlan for BasePlan {
    fn name(&self) -> &'static str {
        "BASE"
    }

    fn rate(&self, tier: TierKind, kind: CommunicationKind) -> Rate {
        BASE_MATRIX[tier.index()][kind.index()]
    }
}

static BASE_PLAN: BasePlan = BasePlan;

/// Serializable handle naming a registered plan.
///
/// Tiers store a `PlanId` rather than a plan object, so a snapshot names
/// the plan and the implementation is resolved on use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanId {
    /// [`BasePlan`].
    #[default]
    Base,
}

impl PlanId {
    /// The plan implementation.
    pub fn plan(&self) -> &'static dyn TariffPlan {
        match self {
            Self::Base => &BASE_PLAN,
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.plan().name())
    }
}
