//! Request signing and bracket-order construction for the Delta Exchange REST API.
//!
//! The crate has two pure building blocks and one thin transport layer:
//! - [`auth`] canonicalizes a request body and produces the HMAC-SHA256 header set
//! - [`bracket`] turns an entry price into tick-aligned stop-loss / take-profit legs
//! - [`client`] sends signed requests over `reqwest`
//!
//! ```rust,ignore
//! use delta_rest_client::auth::{Credentials, HttpMethod, RequestSigner};
//! use delta_rest_client::bracket::{RiskSpec, Strategy, derive_plan};
//! use delta_rest_client::types::Side;
//! use rust_decimal_macros::dec;
//!
//! let strategy = Strategy::FixedRisk(RiskSpec::new(dec!(10), dec!(4)));
//! let plan = derive_plan(dec!(27650), dec!(0.5), &strategy, Side::Buy)?;
//!
//! let credentials = Credentials::new("key", "secret");
//! let signed = RequestSigner::new(&credentials).sign(
//!     HttpMethod::Post,
//!     "/v2/orders",
//!     Some(&body),
//!     timestamp_ms,
//! )?;
//! ```

pub mod auth;
pub mod bracket;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Wall-clock time in epoch milliseconds, as carried in the `timestamp` header.
pub type Timestamp = i64;

pub(crate) async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(headers) = headers {
        request.headers_mut().extend(headers);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(%method, path = %path, "sending request");

    let response = client.execute(request).await?;
    let status_code = response.status();

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(status = %status_code, %method, path = %path, message = %message, "request rejected");

        return Err(Error::status(status_code, method, path, message));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
