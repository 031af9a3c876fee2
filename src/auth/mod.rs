//! Authentication for private REST routes.
//!
//! Every private call carries `api-key`, `timestamp`, `signature` and
//! `Content-Type` headers. The signature is HMAC-SHA256 keyed by the raw API
//! secret over `timestamp + METHOD + path + canonical_body`, base64 encoded
//! with the standard alphabet.
//!
//! Signing is a pure function of its inputs: the caller supplies the
//! timestamp, so the same inputs always produce the same signature.

mod credentials;
mod signer;

pub use credentials::Credentials;
pub use signer::{
    API_KEY, HttpMethod, RequestSigner, SIGNATURE, SignedRequest, TIMESTAMP, canonical_body, sign,
};
