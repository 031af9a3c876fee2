//! Places a limit entry at the current spot price with stop-loss and
//! take-profit attached, 2% below and 10% above.
//!
//! Reads `base_url`, `api_key` and `api_secret` from the environment or a
//! `.env` file. Run with `RUST_LOG=debug` to see the signed requests.

use anyhow::anyhow;
use delta_rest_client::bracket::{
    PayloadConfig, StopTriggerMethod, Strategy, build_bracket_entry_payload, derive_plan,
};
use delta_rest_client::client::DeltaClient;
use delta_rest_client::config::{ClientConfig, RawClientConfig};
use delta_rest_client::types::{ProductId, Side};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PRODUCT_ID: ProductId = 84;
const SYMBOL: &str = "BTCUSD";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = DeltaClient::new(ClientConfig::from_raw(RawClientConfig::from_env()?)?);

    let instrument = client.get_product(PRODUCT_ID).await?;
    let ticker = client.get_ticker(SYMBOL).await?;
    let spot_price = ticker
        .spot_price
        .ok_or_else(|| anyhow!("ticker {SYMBOL} has no spot price"))?;

    let entry_price = spot_price.round_dp(2);

    let plan = derive_plan(
        entry_price,
        instrument.tick_size,
        &Strategy::percentage(dec!(0.02), dec!(0.10)),
        Side::Buy,
    )?;
    info!(?plan, tick_size = %instrument.tick_size, "derived bracket");

    let config = PayloadConfig::builder()
        .size(1)
        .stop_trigger_method(StopTriggerMethod::LastTradedPrice)
        .build();
    let payload = build_bracket_entry_payload(&plan, &instrument, &config)?;

    let response = client.place_order(&payload).await?;
    info!(%response, "order response");

    Ok(())
}
