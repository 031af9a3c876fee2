use serde::Serialize;

use crate::Result;
use crate::bracket::tick::quantize_to_tick;
use crate::error::Error;
use crate::types::{Decimal, Side};

/// Absolute stop distance and the reward-to-risk ratio for the target.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiskSpec {
    pub risk_amount: Decimal,
    pub reward_multiple: Decimal,
}

impl RiskSpec {
    #[must_use]
    pub const fn new(risk_amount: Decimal, reward_multiple: Decimal) -> Self {
        Self {
            risk_amount,
            reward_multiple,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.risk_amount <= Decimal::ZERO {
            return Err(Error::invalid_risk(format!(
                "risk amount must be positive, got {}",
                self.risk_amount
            )));
        }
        if self.reward_multiple <= Decimal::ZERO {
            return Err(Error::invalid_risk(format!(
                "reward multiple must be positive, got {}",
                self.reward_multiple
            )));
        }
        Ok(())
    }
}

/// How stop-loss and take-profit are placed around the entry.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Fractions of the entry price, each in `(0, 1)`.
    Percentage {
        stop_loss_pct: Decimal,
        take_profit_pct: Decimal,
    },
    /// Fixed price distance for the stop, a multiple of it for the target.
    FixedRisk(RiskSpec),
}

impl Strategy {
    #[must_use]
    pub const fn percentage(stop_loss_pct: Decimal, take_profit_pct: Decimal) -> Self {
        Strategy::Percentage {
            stop_loss_pct,
            take_profit_pct,
        }
    }

    #[must_use]
    pub const fn fixed_risk(risk_amount: Decimal, reward_multiple: Decimal) -> Self {
        Strategy::FixedRisk(RiskSpec::new(risk_amount, reward_multiple))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Strategy::Percentage {
                stop_loss_pct,
                take_profit_pct,
            } => {
                ensure_fraction("stop loss percent", *stop_loss_pct)?;
                ensure_fraction("take profit percent", *take_profit_pct)
            }
            Strategy::FixedRisk(risk) => risk.validate(),
        }
    }

    /// Unquantized `(stop, take_profit)` for a position opened on `side`.
    fn raw_prices(&self, entry: Decimal, side: Side) -> Result<(Decimal, Decimal)> {
        let (stop_offset, target_offset) = match self {
            Strategy::Percentage {
                stop_loss_pct,
                take_profit_pct,
            } => (
                checked_mul(entry, *stop_loss_pct)?,
                checked_mul(entry, *take_profit_pct)?,
            ),
            Strategy::FixedRisk(risk) => (
                risk.risk_amount,
                checked_mul(risk.risk_amount, risk.reward_multiple)?,
            ),
        };

        let prices = match side {
            Side::Buy => (
                entry.checked_sub(stop_offset),
                entry.checked_add(target_offset),
            ),
            Side::Sell => (
                entry.checked_add(stop_offset),
                entry.checked_sub(target_offset),
            ),
        };

        match prices {
            (Some(stop), Some(take_profit)) => Ok((stop, take_profit)),
            _ => Err(Error::invalid_risk(format!(
                "bracket around entry {entry} overflows"
            ))),
        }
    }
}

/// Tick-aligned prices for one bracketed position.
///
/// For a long, `stop_price < entry_price < take_profit_price`; mirrored for a
/// short.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BracketPlan {
    pub side: Side,
    pub entry_price: Decimal,
    pub stop_price: Decimal,
    pub take_profit_price: Decimal,
}

impl BracketPlan {
    /// Side both exit legs trade on.
    #[must_use]
    pub const fn exit_side(&self) -> Side {
        self.side.opposite()
    }
}

/// Derives and quantizes stop-loss and take-profit prices around `entry_price`.
///
/// Fails with `InvalidInstrument` for a non-positive tick, `InvalidRisk` for
/// out-of-range parameters, and `DegenerateBracket` when quantization collapses
/// either exit onto the entry or out of order.
pub fn derive_plan(
    entry_price: Decimal,
    tick_size: Decimal,
    strategy: &Strategy,
    side: Side,
) -> Result<BracketPlan> {
    if tick_size <= Decimal::ZERO {
        return Err(Error::invalid_instrument(format!(
            "tick size must be positive, got {tick_size}"
        )));
    }
    strategy.validate()?;
    if entry_price <= Decimal::ZERO {
        return Err(Error::invalid_risk(format!(
            "entry price must be positive, got {entry_price}"
        )));
    }

    let (raw_stop, raw_take_profit) = strategy.raw_prices(entry_price, side)?;

    let plan = BracketPlan {
        side,
        entry_price: quantize_to_tick(entry_price, tick_size)?,
        stop_price: quantize_to_tick(raw_stop, tick_size)?,
        take_profit_price: quantize_to_tick(raw_take_profit, tick_size)?,
    };

    let ordered = match side {
        Side::Buy => {
            plan.stop_price < plan.entry_price && plan.entry_price < plan.take_profit_price
        }
        Side::Sell => {
            plan.take_profit_price < plan.entry_price && plan.entry_price < plan.stop_price
        }
    };
    if !ordered {
        return Err(Error::degenerate_bracket(format!(
            "{side} bracket collapsed at tick {tick_size}: stop {}, entry {}, take profit {}",
            plan.stop_price, plan.entry_price, plan.take_profit_price
        )));
    }
    if plan.stop_price <= Decimal::ZERO || plan.take_profit_price <= Decimal::ZERO {
        return Err(Error::degenerate_bracket(format!(
            "{side} bracket exits must stay positive: stop {}, take profit {}",
            plan.stop_price, plan.take_profit_price
        )));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(?strategy, ?plan, %tick_size, "derived bracket plan");

    Ok(plan)
}

fn ensure_fraction(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO || value >= Decimal::ONE {
        return Err(Error::invalid_risk(format!(
            "{field} must be within (0, 1), got {value}"
        )));
    }
    Ok(())
}

fn checked_mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| Error::invalid_risk(format!("{lhs} * {rhs} overflows")))
}
