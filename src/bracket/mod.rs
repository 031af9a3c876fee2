//! Bracket order construction.
//!
//! A bracket is derived in two steps:
//! - [`derive_plan`] places stop-loss and take-profit around a filled entry
//!   using a [`Strategy`], flooring every price to the instrument's tick
//! - [`build_leg_payload`] / [`build_bracket_entry_payload`] turn the plan into
//!   exchange order bodies, both exits reduce-only on the opposite side
//!
//! Nothing here performs I/O or keeps state between calls.

mod payload;
mod plan;
mod tick;

pub use payload::{
    BracketEntryPayload, Leg, OrderPayload, OrderType, PayloadConfig, StopTriggerMethod,
    TimeInForce, build_bracket_entry_payload, build_leg_payload,
};
pub use plan::{BracketPlan, RiskSpec, Strategy, derive_plan};
pub use tick::{PRICE_SCALE, quantize_to_tick};
