use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::Result;
use crate::error::Error;

/// API key pair used to authenticate private REST calls.
///
/// The secret is held in a [`SecretString`], so `Debug` output redacts it and
/// the backing memory is zeroed on drop.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    #[serde(alias = "apiKey")]
    api_key: String,
    #[serde(alias = "apiSecret")]
    api_secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new<K: Into<String>, S: Into<String>>(api_key: K, api_secret: S) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Public half of the key pair, safe to log.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.api_secret
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::invalid_credentials("api key is empty"));
        }
        if self.api_secret.expose_secret().is_empty() {
            return Err(Error::invalid_credentials("api secret is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn debug_redacts_secret() {
        let credentials = Credentials::new("my_api_key", "super_secret_value");
        let debug = format!("{credentials:?}");

        assert!(debug.contains("my_api_key"));
        assert!(!debug.contains("super_secret_value"));
    }

    #[test]
    fn empty_key_or_secret_is_rejected() {
        assert!(Credentials::new("key", "secret").validate().is_ok());

        let err = Credentials::new("", "secret").validate().unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidCredentials);

        let err = Credentials::new("key", "").validate().unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidCredentials);
    }

    #[test]
    fn deserializes_from_app_config() {
        let credentials: Credentials =
            serde_json::from_str(r#"{"apiKey":"abc","apiSecret":"xyz"}"#).unwrap();
        assert_eq!(credentials.key(), "abc");
        assert_eq!(credentials.secret().expose_secret(), "xyz");
    }
}
