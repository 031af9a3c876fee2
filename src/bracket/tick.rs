use crate::Result;
use crate::error::Error;
use crate::types::Decimal;

/// Decimal places every quantized price is reported with.
pub const PRICE_SCALE: u32 = 2;

/// Floors `price` to a multiple of `tick_size`, then rounds the result to
/// [`PRICE_SCALE`] decimal places (half-to-even).
///
/// Flooring never moves a price above what was computed. With a tick that has
/// more than two decimal places the final rounding can break both tick
/// alignment and the floor bound; callers trading such instruments must
/// account for that.
pub fn quantize_to_tick(price: Decimal, tick_size: Decimal) -> Result<Decimal> {
    if tick_size <= Decimal::ZERO {
        return Err(Error::invalid_instrument(format!(
            "tick size must be positive, got {tick_size}"
        )));
    }

    let ticks = price
        .checked_div(tick_size)
        .ok_or_else(|| overflow(price, tick_size))?
        .floor();
    let floored = ticks
        .checked_mul(tick_size)
        .ok_or_else(|| overflow(price, tick_size))?;

    let mut quantized = floored.round_dp(PRICE_SCALE);
    quantized.rescale(PRICE_SCALE);
    Ok(quantized)
}

fn overflow(price: Decimal, tick_size: Decimal) -> Error {
    Error::invalid_instrument(format!(
        "price {price} cannot be expressed in ticks of {tick_size}"
    ))
}
