use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

/// Category of an [`Error`].
///
/// Everything for which [`Kind::is_validation`] returns `true` is raised
/// synchronously before any I/O happens and should be fixed at the call site
/// rather than retried.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// API key or secret is empty or cannot be carried in a header.
    InvalidCredentials,
    /// HTTP method outside `GET`, `POST`, `PUT`, `DELETE`.
    UnsupportedMethod,
    /// Instrument metadata is unusable, e.g. a non-positive tick size.
    InvalidInstrument,
    /// Risk parameters are out of range.
    InvalidRisk,
    /// Tick quantization collapsed a bracket price onto (or past) the entry.
    DegenerateBracket,
    /// Malformed configuration input.
    Validation,
    /// The exchange answered with a non-success status code.
    Status,
    /// The request never produced a response.
    Transport,
    /// Serialization failures and other states the caller cannot fix.
    Internal,
}

impl Kind {
    #[must_use]
    pub const fn is_validation(self) -> bool {
        matches!(
            self,
            Kind::InvalidCredentials
                | Kind::UnsupportedMethod
                | Kind::InvalidInstrument
                | Kind::InvalidRisk
                | Kind::DegenerateBracket
                | Kind::Validation
        )
    }
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::Validation, reason)
    }

    pub fn invalid_credentials<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::InvalidCredentials, reason)
    }

    pub fn unsupported_method<S: Into<String>>(method: S) -> Self {
        Self::rejected(
            Kind::UnsupportedMethod,
            format!(
                "unsupported HTTP method `{}`; expected one of: GET|POST|PUT|DELETE",
                method.into()
            ),
        )
    }

    pub fn invalid_instrument<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::InvalidInstrument, reason)
    }

    pub fn invalid_risk<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::InvalidRisk, reason)
    }

    pub fn degenerate_bracket<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::DegenerateBracket, reason)
    }

    pub fn internal<S: Into<String>>(reason: S) -> Self {
        Self::rejected(Kind::Internal, reason)
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Self::with_source(
            Kind::Status,
            Status {
                status_code,
                method,
                path,
                message: message.into(),
            },
        )
    }

    fn rejected<S: Into<String>>(kind: Kind, reason: S) -> Self {
        Self::with_source(
            kind,
            Rejected {
                reason: reason.into(),
            },
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Free-form reason attached to validation-family and internal errors.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub reason: String,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl StdError for Rejected {}

/// Non-success HTTP response returned by the exchange.
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::with_source(Kind::Validation, e)
        } else if e.is_decode() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Transport, e)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_family_is_flagged() {
        for kind in [
            Kind::InvalidCredentials,
            Kind::UnsupportedMethod,
            Kind::InvalidInstrument,
            Kind::InvalidRisk,
            Kind::DegenerateBracket,
            Kind::Validation,
        ] {
            assert!(kind.is_validation(), "{kind:?} should be a validation kind");
        }
        for kind in [Kind::Status, Kind::Transport, Kind::Internal] {
            assert!(!kind.is_validation(), "{kind:?} should not be a validation kind");
        }
    }

    #[test]
    fn display_includes_kind_and_reason() {
        let err = Error::invalid_risk("reward multiple must be positive, got 0");
        assert_eq!(err.kind(), Kind::InvalidRisk);
        assert_eq!(
            err.to_string(),
            "InvalidRisk: reward multiple must be positive, got 0"
        );
        assert!(err.downcast_ref::<Rejected>().is_some());
    }

    #[test]
    fn status_error_carries_request_context() {
        let err = Error::status(
            StatusCode::UNAUTHORIZED,
            Method::POST,
            "/v2/orders".to_owned(),
            r#"{"error":{"code":"InvalidApiKey"}}"#,
        );
        assert_eq!(err.kind(), Kind::Status);
        let status = err.downcast_ref::<Status>().expect("status source");
        assert_eq!(status.status_code, StatusCode::UNAUTHORIZED);
        assert_eq!(status.path, "/v2/orders");
    }
}
