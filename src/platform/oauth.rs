//! OAuth 1.0a request signing (RFC 5849).
//!
//! Every API call carries an `Authorization: OAuth …` header built here:
//! percent-encode all request parameters with the RFC 3986 unreserved set,
//! sort them, collapse them into the signature base string, sign with
//! HMAC-SHA1 keyed by `consumer_secret&token_secret`, base64 the digest.
//!
//! The signer is pure: nonce and timestamp are inputs, so tests can pin them
//! and check against the platform's published example signature.

use crate::config::Credentials;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Everything except RFC 3986 unreserved characters gets encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string per the OAuth parameter rules.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Build the signature base string from the HTTP method, the base URL
/// (no query string) and every request parameter, oauth ones included.
fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_url),
        encode(&normalized)
    )
}

/// HMAC-SHA1 over the base string, keyed by the two secrets, base64 encoded.
fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    // HMAC accepts keys of any length.
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC key of any length is valid");
    mac.update(base.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Generate a random alphanumeric nonce.
pub fn nonce() -> String {
    (0..32).map(|_| fastrand::alphanumeric()).collect()
}

/// Seconds since the Unix epoch.
pub fn timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Build the `Authorization` header value for one request.
///
/// `request_params` are the query or form parameters of the call — they are
/// part of the signature but not of the header. RFC 5849 excludes multipart
/// body parameters from the signature, so upload calls pass an empty slice.
pub fn authorization_header(
    method: &str,
    base_url: &str,
    request_params: &[(&str, &str)],
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), credentials.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp.clone()),
        ("oauth_token".into(), credentials.access_token.clone()),
        ("oauth_version".into(), "1.0".into()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        request_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let base = signature_base_string(method, base_url, &all_params);
    let signature = sign(
        &base,
        &credentials.consumer_secret,
        &credentials.access_secret,
    );

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".into(), signature));
    header_params.sort();

    let fields = header_params
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", fields)
}
