use delta_rest_client::auth::{
    API_KEY, Credentials, HttpMethod, RequestSigner, SIGNATURE, TIMESTAMP, canonical_body, sign,
};
use delta_rest_client::error::Kind;
use serde_json::{Value, json};

const TS: i64 = 1_700_000_000_000;

fn credentials() -> Credentials {
    Credentials::new("key", "secret")
}

#[test]
fn signature_is_deterministic() -> anyhow::Result<()> {
    let creds = credentials();
    let signer = RequestSigner::new(&creds);
    let body = json!({"product_id": 84, "side": "buy", "size": 1});

    let first = signer.sign(HttpMethod::Post, "/v2/orders", Some(&body), TS)?;
    let second = signer.sign(HttpMethod::Post, "/v2/orders", Some(&body), TS)?;

    assert_eq!(first, second);
    assert_eq!(
        first.signature,
        "YjoqtAfl7I9wJ5+B0mPDUdTSnulKH9qAAQG+xS8T80A="
    );
    Ok(())
}

#[test]
fn key_insertion_order_does_not_change_signature() -> anyhow::Result<()> {
    let creds = credentials();

    let mut ba = serde_json::Map::new();
    ba.insert("b".to_owned(), json!(1));
    ba.insert("a".to_owned(), json!(2));
    let mut ab = serde_json::Map::new();
    ab.insert("a".to_owned(), json!(2));
    ab.insert("b".to_owned(), json!(1));

    let from_ba = sign(&creds, HttpMethod::Post, "/v2/orders", Some(&Value::Object(ba)), TS)?;
    let from_ab = sign(&creds, HttpMethod::Post, "/v2/orders", Some(&Value::Object(ab)), TS)?;

    assert_eq!(from_ba.body, r#"{"a":2,"b":1}"#);
    assert_eq!(from_ba.signature, from_ab.signature);
    assert_eq!(
        from_ba.signature,
        "DXQ3ykUKPvEERwl9LTx0GgaELBFi3XzxVL5APHTvcPo="
    );
    Ok(())
}

#[test]
fn literal_whitespace_does_not_change_canonical_form() -> anyhow::Result<()> {
    let compact: Value = serde_json::from_str(r#"{"a":2}"#)?;
    let spaced: Value = serde_json::from_str(r#"{"a": 2}"#)?;

    assert_eq!(canonical_body(Some(&compact))?, r#"{"a":2}"#);
    assert_eq!(canonical_body(Some(&spaced))?, r#"{"a":2}"#);
    Ok(())
}

#[test]
fn missing_and_empty_bodies_sign_identically() -> anyhow::Result<()> {
    let creds = credentials();
    let signer = RequestSigner::new(&creds);

    let absent = signer.sign(HttpMethod::Get, "/v2/orders", None, TS)?;
    let empty = signer.sign(HttpMethod::Get, "/v2/orders", Some(&json!({})), TS)?;

    assert_eq!(absent.body, "");
    assert_eq!(empty.body, "");
    assert_eq!(absent.signature, empty.signature);
    Ok(())
}

#[test]
fn lowercase_method_signs_as_uppercase() -> anyhow::Result<()> {
    let creds = credentials();
    let body = json!({"b": 1, "a": 2});

    let lower = sign(&creds, "post".parse()?, "/v2/orders", Some(&body), TS)?;
    let upper = sign(&creds, HttpMethod::Post, "/v2/orders", Some(&body), TS)?;

    assert_eq!(lower.signature, upper.signature);
    Ok(())
}

#[test]
fn path_and_timestamp_are_covered() -> anyhow::Result<()> {
    let creds = credentials();
    let signer = RequestSigner::new(&creds);

    let base = signer.sign(HttpMethod::Get, "/v2/orders", None, TS)?;
    let other_path = signer.sign(HttpMethod::Get, "/v2/orders?state=open", None, TS)?;
    let other_time = signer.sign(HttpMethod::Get, "/v2/orders", None, TS + 1)?;
    let other_method = signer.sign(HttpMethod::Delete, "/v2/orders", None, TS)?;

    assert_ne!(base.signature, other_path.signature);
    assert_ne!(base.signature, other_time.signature);
    assert_ne!(base.signature, other_method.signature);
    Ok(())
}

#[test]
fn unsupported_method_and_empty_credentials_fail() {
    let err = "PATCH".parse::<HttpMethod>().unwrap_err();
    assert_eq!(err.kind(), Kind::UnsupportedMethod);
    assert!(err.kind().is_validation());

    let creds = Credentials::new("", "secret");
    let err = sign(&creds, HttpMethod::Get, "/v2/orders", None, TS).unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidCredentials);
}

#[test]
fn header_set_is_complete() -> anyhow::Result<()> {
    let creds = credentials();
    let signed = RequestSigner::new(&creds).sign_json(
        HttpMethod::Post,
        "/v2/orders",
        &json!({"size": 1}),
        TS,
    )?;
    let headers = signed.headers()?;

    assert_eq!(headers.len(), 4);
    assert_eq!(headers[API_KEY], "key");
    assert_eq!(headers[TIMESTAMP], TS.to_string().as_str());
    assert_eq!(headers[SIGNATURE], signed.signature.as_str());
    assert_eq!(headers["content-type"], "application/json");
    Ok(())
}
