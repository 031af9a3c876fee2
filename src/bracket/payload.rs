use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum_macros::Display;

use crate::Result;
use crate::bracket::plan::BracketPlan;
use crate::types::{Decimal, Instrument, ProductId, Side};

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderType {
    LimitOrder,
    MarketOrder,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
    Fok,
}

/// Price feed the exchange watches to fire a triggered order.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopTriggerMethod {
    LastTradedPrice,
    MarkPrice,
    SpotPrice,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Leg {
    StopLoss,
    TakeProfit,
}

/// Settings shared by every payload built from a plan.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Builder)]
pub struct PayloadConfig {
    #[builder(default)]
    pub time_in_force: TimeInForce,
    pub stop_trigger_method: Option<StopTriggerMethod>,
    /// Contracts per order. Omitted from the payload when unset.
    pub size: Option<u64>,
}

/// One exit order, ready to be serialized as a request body.
#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderPayload {
    pub product_id: ProductId,
    pub size: Option<u64>,
    pub side: Side,
    pub order_type: OrderType,
    pub limit_price: Option<Decimal>,
    pub trigger_price: Decimal,
    pub stop_trigger_method: Option<StopTriggerMethod>,
    pub reduce_only: bool,
    pub time_in_force: TimeInForce,
}

/// A limit entry order carrying both exits, submitted as one request.
#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BracketEntryPayload {
    pub product_id: ProductId,
    pub limit_price: Decimal,
    pub size: Option<u64>,
    pub side: Side,
    pub order_type: OrderType,
    pub stop_trigger_method: Option<StopTriggerMethod>,
    pub bracket_stop_loss_limit_price: Decimal,
    pub bracket_stop_loss_price: Decimal,
    pub bracket_take_profit_limit_price: Decimal,
    pub bracket_take_profit_price: Decimal,
    pub time_in_force: TimeInForce,
}

/// Builds the reduce-only exit order for `leg`.
///
/// The take-profit is a limit order resting at its trigger; the stop-loss
/// fires a market order.
pub fn build_leg_payload(
    plan: &BracketPlan,
    leg: Leg,
    instrument: &Instrument,
    config: &PayloadConfig,
) -> Result<OrderPayload> {
    instrument.validate()?;

    let (order_type, limit_price, trigger_price) = match leg {
        Leg::TakeProfit => (
            OrderType::LimitOrder,
            Some(plan.take_profit_price),
            plan.take_profit_price,
        ),
        Leg::StopLoss => (OrderType::MarketOrder, None, plan.stop_price),
    };

    Ok(OrderPayload {
        product_id: instrument.product_id,
        size: config.size,
        side: plan.exit_side(),
        order_type,
        limit_price,
        trigger_price,
        stop_trigger_method: config.stop_trigger_method,
        reduce_only: true,
        time_in_force: config.time_in_force,
    })
}

/// Builds the single-request form: a limit entry at the plan's entry price
/// with both exits attached, limit prices equal to their triggers.
pub fn build_bracket_entry_payload(
    plan: &BracketPlan,
    instrument: &Instrument,
    config: &PayloadConfig,
) -> Result<BracketEntryPayload> {
    instrument.validate()?;

    Ok(BracketEntryPayload {
        product_id: instrument.product_id,
        limit_price: plan.entry_price,
        size: config.size,
        side: plan.side,
        order_type: OrderType::LimitOrder,
        stop_trigger_method: config.stop_trigger_method,
        bracket_stop_loss_limit_price: plan.stop_price,
        bracket_stop_loss_price: plan.stop_price,
        bracket_take_profit_limit_price: plan.take_profit_price,
        bracket_take_profit_price: plan.take_profit_price,
        time_in_force: config.time_in_force,
    })
}
