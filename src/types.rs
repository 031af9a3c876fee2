use std::str::FromStr;

pub use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::Result;
use crate::error::Error;

/// Numeric product identifier assigned by the exchange.
pub type ProductId = u64;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side that closes a position opened on `self`.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Ok(Side::Buy),
            "sell" | "short" => Ok(Side::Sell),
            other => Err(Error::validation(format!(
                "invalid side `{other}`; expected one of: buy|sell"
            ))),
        }
    }
}

/// Contract metadata needed to build orders: where to send them and how
/// finely they may be priced.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Instrument {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub tick_size: Decimal,
}

impl Instrument {
    pub fn new(product_id: ProductId, tick_size: Decimal) -> Result<Self> {
        let instrument = Self {
            product_id,
            tick_size,
        };
        instrument.validate()?;
        Ok(instrument)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_size <= Decimal::ZERO {
            return Err(Error::invalid_instrument(format!(
                "product {} has non-positive tick size {}",
                self.product_id, self.tick_size
            )));
        }
        Ok(())
    }
}
