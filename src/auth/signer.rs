use std::io;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac as _};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Serializer, Value};
use sha2::Sha256;
use strum_macros::Display;

use crate::auth::Credentials;
use crate::error::Error;
use crate::{Result, Timestamp};

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY: &str = "api-key";
pub const TIMESTAMP: &str = "timestamp";
pub const SIGNATURE: &str = "signature";

const APPLICATION_JSON: &str = "application/json";

/// HTTP methods the exchange accepts on authenticated routes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(Error::unsupported_method(other)),
        }
    }
}

impl TryFrom<&Method> for HttpMethod {
    type Error = Error;

    fn try_from(method: &Method) -> Result<Self> {
        method.as_str().parse()
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Everything needed to transmit one authenticated call.
///
/// Only valid for the request it was built for: the server checks the
/// timestamp for freshness and recomputes the signature over `path` and `body`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    pub api_key: String,
    pub timestamp: Timestamp,
    pub method: HttpMethod,
    pub path: String,
    /// Canonical body that was signed. Send exactly these bytes.
    pub body: String,
    pub signature: String,
}

impl SignedRequest {
    /// The four headers required on every authenticated call.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.api_key).map_err(|e| {
            Error::invalid_credentials(format!("api key is not a valid header value: {e}"))
        })?;
        let mut signature = HeaderValue::from_str(&self.signature)
            .map_err(|e| Error::internal(format!("signature is not a valid header value: {e}")))?;
        signature.set_sensitive(true);

        map.insert(HeaderName::from_static(API_KEY), api_key);
        map.insert(
            HeaderName::from_static(TIMESTAMP),
            HeaderValue::from(self.timestamp),
        );
        map.insert(HeaderName::from_static(SIGNATURE), signature);
        map.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

        Ok(map)
    }
}

/// Signs REST calls with a borrowed key pair.
#[derive(Clone, Copy, Debug)]
pub struct RequestSigner<'creds> {
    credentials: &'creds Credentials,
}

impl<'creds> RequestSigner<'creds> {
    #[must_use]
    pub fn new(credentials: &'creds Credentials) -> Self {
        Self { credentials }
    }

    /// Signs `timestamp + METHOD + path + canonical_body` with HMAC-SHA256.
    ///
    /// `path` is covered verbatim, so it must be the exact route (including any
    /// query string) that will be transmitted. `timestamp` is supplied by the
    /// caller and should be taken right before sending.
    pub fn sign(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        timestamp: Timestamp,
    ) -> Result<SignedRequest> {
        self.credentials.validate()?;

        let body = canonical_body(body)?;
        let message = format!("{timestamp}{method}{path}{body}");
        let signature = hmac_base64(self.credentials.secret(), &message)?;

        Ok(SignedRequest {
            api_key: self.credentials.key().to_owned(),
            timestamp,
            method,
            path: path.to_owned(),
            body,
            signature,
        })
    }

    /// Serializes `body` to a JSON value first, then signs it.
    pub fn sign_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
        timestamp: Timestamp,
    ) -> Result<SignedRequest> {
        let body = serde_json::to_value(body)?;
        self.sign(method, path, Some(&body), timestamp)
    }
}

/// Free-function form of [`RequestSigner::sign`].
pub fn sign(
    credentials: &Credentials,
    method: HttpMethod,
    path: &str,
    body: Option<&Value>,
    timestamp: Timestamp,
) -> Result<SignedRequest> {
    RequestSigner::new(credentials).sign(method, path, body, timestamp)
}

/// Compact JSON with object keys sorted at every depth and every non-ASCII
/// character escaped as `\uXXXX`.
///
/// Absent, `null`, `{}` and `[]` bodies all map to the empty string. Key order
/// is enforced here rather than relying on `serde_json`'s map type, which
/// preserves insertion order when `preserve_order` is enabled anywhere in the
/// dependency graph.
pub fn canonical_body(body: Option<&Value>) -> Result<String> {
    let value = match body {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(Value::Object(map)) if map.is_empty() => return Ok(String::new()),
        Some(Value::Array(items)) if items.is_empty() => return Ok(String::new()),
        Some(value) => value,
    };

    let mut out = Vec::new();
    sorted(value).serialize(&mut Serializer::with_formatter(&mut out, AsciiFormatter))?;

    String::from_utf8(out).map_err(|e| Error::internal(format!("canonical body is not UTF-8: {e}")))
}

/// Compact output, but strings are written ASCII-only with UTF-16 escapes.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        let mut units = [0_u16; 2];

        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&bytes[start..index])?;
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }

        writer.write_all(&bytes[start..])
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn hmac_base64(secret: &SecretString, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| Error::internal(format!("rejected HMAC key: {e}")))?;
    mac.update(message.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
