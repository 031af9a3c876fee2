use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;

pub const BASE_URL_VAR: &str = "base_url";
pub const API_KEY_VAR: &str = "api_key";
pub const API_SECRET_VAR: &str = "api_secret";

/// Raw connection values typically passed from app-level bot config.
#[derive(Clone, Debug)]
pub struct RawClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: SecretString,
}

impl RawClientConfig {
    /// Reads `base_url`, `api_key` and `api_secret`, loading a `.env` file
    /// first when one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            base_url: env_var(BASE_URL_VAR)?,
            api_key: env_var(API_KEY_VAR)?,
            api_secret: SecretString::from(env_var(API_SECRET_VAR)?),
        })
    }
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub host: Url,
    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn from_raw(raw: RawClientConfig) -> Result<Self> {
        let host = Url::parse(raw.base_url.trim())?;
        let credentials = Credentials::new(raw.api_key, raw.api_secret.expose_secret());

        Self::new(host, credentials)
    }

    pub fn new(host: Url, credentials: Credentials) -> Result<Self> {
        if host.cannot_be_a_base() || !matches!(host.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "base url must be an http(s) url, got `{host}`"
            )));
        }
        credentials.validate()?;

        Ok(Self { host, credentials })
    }
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|e| Error::validation(format!("environment variable `{name}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn raw(base_url: &str, api_key: &str, api_secret: &str) -> RawClientConfig {
        RawClientConfig {
            base_url: base_url.to_owned(),
            api_key: api_key.to_owned(),
            api_secret: SecretString::from(api_secret.to_owned()),
        }
    }

    #[test]
    fn from_raw_parses_host_and_credentials() {
        let config =
            ClientConfig::from_raw(raw(" https://cdn-ind.testnet.deltaex.org ", "key", "secret"))
                .unwrap();

        assert_eq!(config.host.as_str(), "https://cdn-ind.testnet.deltaex.org/");
        assert_eq!(config.credentials.key(), "key");
    }

    #[test]
    fn from_raw_rejects_bad_url() {
        let err = ClientConfig::from_raw(raw("not a url", "key", "secret")).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);

        let err = ClientConfig::from_raw(raw("ftp://example.com", "key", "secret")).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn from_raw_rejects_empty_credentials() {
        let err =
            ClientConfig::from_raw(raw("https://api.india.delta.exchange", "", "secret"))
                .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidCredentials);
    }

    #[test]
    fn missing_env_var_is_a_validation_error() {
        let err = env_var("DELTA_REST_CLIENT_SURELY_UNSET_VARIABLE").unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);
    }
}
