use chrono::Utc;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, HttpMethod, RequestSigner, SignedRequest};
use crate::bracket::{BracketPlan, Leg, PayloadConfig, build_leg_payload};
use crate::config::ClientConfig;
use crate::types::{Decimal, Instrument, ProductId};
use crate::{Result, Timestamp};

const ORDERS: &str = "/v2/orders";

/// Every REST response is wrapped as `{"success": .., "result": ..}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    #[serde(default)]
    pub spot_price: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
}

/// Raw exchange responses for the two exit orders of a bracket.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct BracketLegResponses {
    pub stop_loss: Value,
    pub take_profit: Value,
}

/// Thin REST client: signs private calls and returns exchange JSON as-is.
///
/// It does not retry. Non-2xx responses surface as `Kind::Status`, network
/// failures as `Kind::Transport`.
#[derive(Clone, Debug)]
pub struct DeltaClient {
    host: Url,
    credentials: Credentials,
    client: ReqwestClient,
}

impl DeltaClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(config, ReqwestClient::new())
    }

    #[must_use]
    pub fn with_client(config: ClientConfig, client: ReqwestClient) -> Self {
        Self {
            host: config.host,
            credentials: config.credentials,
            client,
        }
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Fetches product metadata; the tick size must be positive.
    pub async fn get_product(&self, product_id: ProductId) -> Result<Instrument> {
        let envelope: Envelope<Instrument> = self
            .public_get(&format!("/v2/products/{product_id}"))
            .await?;
        envelope.result.validate()?;

        Ok(envelope.result)
    }

    pub async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        let envelope: Envelope<Ticker> = self.public_get(&format!("/v2/tickers/{symbol}")).await?;
        Ok(envelope.result)
    }

    /// Signs and submits an order with a fresh timestamp.
    pub async fn place_order<B: Serialize>(&self, payload: &B) -> Result<Value> {
        self.place_order_at(payload, None).await
    }

    /// Signs and submits an order, optionally pinning the timestamp.
    pub async fn place_order_at<B: Serialize>(
        &self,
        payload: &B,
        timestamp: Option<Timestamp>,
    ) -> Result<Value> {
        let timestamp = timestamp.unwrap_or_else(now_millis);
        let signed = RequestSigner::new(&self.credentials).sign_json(
            HttpMethod::Post,
            ORDERS,
            payload,
            timestamp,
        )?;

        self.send_signed(&signed).await
    }

    /// Submits the stop-loss leg, then the take-profit leg.
    ///
    /// The two requests are independent: if the second fails the first is
    /// already live on the exchange.
    pub async fn place_bracket_legs(
        &self,
        plan: &BracketPlan,
        instrument: &Instrument,
        config: &PayloadConfig,
    ) -> Result<BracketLegResponses> {
        let stop_loss = build_leg_payload(plan, Leg::StopLoss, instrument, config)?;
        let take_profit = build_leg_payload(plan, Leg::TakeProfit, instrument, config)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            product_id = instrument.product_id,
            side = %plan.exit_side(),
            stop_price = %plan.stop_price,
            take_profit_price = %plan.take_profit_price,
            "placing bracket legs"
        );

        Ok(BracketLegResponses {
            stop_loss: self.place_order(&stop_loss).await?,
            take_profit: self.place_order(&take_profit).await?,
        })
    }

    /// Transmits a request exactly as it was signed: same route, same body bytes.
    pub async fn send_signed<Response: DeserializeOwned>(
        &self,
        signed: &SignedRequest,
    ) -> Result<Response> {
        let mut builder = self
            .client
            .request(Method::from(signed.method), self.endpoint(&signed.path)?);
        if !signed.body.is_empty() {
            builder = builder.body(signed.body.clone());
        }
        let request = builder.build()?;

        crate::request(&self.client, request, Some(signed.headers()?)).await
    }

    async fn public_get<Response: DeserializeOwned>(&self, path: &str) -> Result<Response> {
        let request = self
            .client
            .request(Method::GET, self.endpoint(path)?)
            .build()?;

        crate::request(&self.client, request, None).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}

fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}
