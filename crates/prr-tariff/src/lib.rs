//! # prr-tariff — Tariff Pricing
//!
//! Pricing is a pure function of `(tier, communication kind, units,
//! friendship)`. The friendship flag is an argument of every query; plans
//! hold no per-query state, so one plan instance can be shared freely.
//!
//! ## Modules
//!
//! - **Kinds** (`kind.rs`): [`TierKind`] (`Normal < Gold < Platinum`) and
//!   [`CommunicationKind`] (`Text`, `Voice`, `Video`).
//!
//! - **Plans** (`plan.rs`): the [`TariffPlan`] contract, the [`Rate`] cell
//!   shape, the [`BasePlan`] matrix, and [`PlanId`], the serializable handle
//!   a client tier stores to name its plan.

pub mod kind;
pub mod plan;

pub use kind::{CommunicationKind, TierKind};
pub use plan::{Band, BasePlan, Beyond, PlanId, Rate, TariffPlan, FRIEND_DISCOUNT};
