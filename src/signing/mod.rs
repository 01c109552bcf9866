//! MYRA request signing.
//!
//! Every API call is authenticated with a signature derived from the
//! request itself:
//!
//! 1. A canonical **string-to-sign** is built from the request:
//!    `md5(body) '#' method '#' uri '#' content-type '#' date`.
//! 2. A signing key is derived by chaining HMAC-SHA256:
//!    `key1 = HMAC(key: "MYRA" + secret, msg: date)` and
//!    `key2 = HMAC(key: key1, msg: "myra-api-request")`, where each
//!    intermediate key is the lowercase-hex encoding of the MAC output.
//! 3. The signature is `base64(HMAC-SHA512(key: key2, msg: string-to-sign))`
//!    over the raw MAC bytes.
//!
//! The whole chain is a pure function of its inputs: identical inputs
//! always produce the identical base64 string, and no input can make it
//! fail. Absent headers degrade to the empty string.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use md5::Md5;
use reqwest::header::HeaderMap;
use sha2::{Digest, Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Authentication scheme name used in the `Authorization` header.
pub const AUTH_SCHEME: &str = "MYRA";

/// Fixed message authenticated by the second key-derivation step.
const KEY_DERIVATION_MESSAGE: &str = "myra-api-request";

/// Calculate the MD5 digest of data as a lowercase hex string.
///
/// The empty body hashes to the MD5 of the empty string
/// (`d41d8cd98f00b204e9800998ecf8427e`), never to an empty digest.
pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate HMAC-SHA256 and return the output as a lowercase hex string.
fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Calculate HMAC-SHA512 and return the raw output bytes.
fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Returns the last inserted value for a header, or `""` when the header
/// is absent or not valid UTF-8.
///
/// When a header name maps to multiple values only the last one in
/// insertion order takes part in signing.
pub fn last_header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get_all(name)
        .iter()
        .last()
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Build the canonical string-to-sign for a request.
///
/// `uri` must be the path the request is actually sent to, including the
/// language prefix and, for list calls, the page suffix.
pub fn string_to_sign(method: &str, uri: &str, headers: &HeaderMap, content: &str) -> String {
    format!(
        "{}#{}#{}#{}#{}",
        md5_hex(content.as_bytes()),
        method,
        uri,
        last_header_value(headers, "Content-Type"),
        last_header_value(headers, "Date"),
    )
}

/// Compute the MYRA signature for a request.
///
/// Deterministic and total: any combination of string inputs yields a
/// signature, never an error.
pub fn sign(method: &str, uri: &str, secret: &str, headers: &HeaderMap, content: &str) -> String {
    let signing_string = string_to_sign(method, uri, headers, content);
    let date = last_header_value(headers, "Date");

    let key1 = hmac_sha256_hex(format!("{}{}", AUTH_SCHEME, secret).as_bytes(), date.as_bytes());
    let key2 = hmac_sha256_hex(key1.as_bytes(), KEY_DERIVATION_MESSAGE.as_bytes());

    BASE64.encode(hmac_sha512(key2.as_bytes(), signing_string.as_bytes()))
}

/// Build the full `Authorization` header value for a signed request.
pub fn authorization_header(api_key: &str, signature: &str) -> String {
    format!("{} {}:{}", AUTH_SCHEME, api_key, signature)
}
