//! Webhook signature scheme.
//!
//! The `Stripe-Signature` header carries a unix timestamp and one or more
//! hex-encoded HMAC-SHA256 signatures over `"{timestamp}.{body}"`:
//!
//! ```text
//! t=1700000000,v1=5257a869e7...,v1=8f3a0b12cd...
//! ```
//!
//! Multiple `v1` entries appear while a webhook secret is being rotated;
//! any one matching is enough.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Check a `Stripe-Signature` header against the raw request body.
#[must_use]
pub fn verify(secret: &str, header: &str, payload: &str) -> bool {
    let Some(parsed) = SignatureHeader::parse(header) else {
        return false;
    };

    let expected = digest(secret, parsed.timestamp, payload);
    parsed
        .candidates
        .iter()
        .any(|candidate| matches_constant_time(expected.as_bytes(), candidate.as_bytes()))
}

/// Produce a complete header value for `payload`, as Stripe would.
///
/// Only used to fabricate webhook deliveries in tests.
#[must_use]
pub fn sign(secret: &str, timestamp: &str, payload: &str) -> String {
    format!("t={timestamp},v1={}", digest(secret, timestamp, payload))
}

fn digest(secret: &str, timestamp: &str, payload: &str) -> String {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

struct SignatureHeader<'a> {
    timestamp: &'a str,
    candidates: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    fn parse(header: &'a str) -> Option<Self> {
        let mut timestamp = None;
        let mut candidates = Vec::new();

        for element in header.split(',') {
            match element.split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => candidates.push(value),
                // Unknown schemes (v0, ...) are ignored.
                _ => {}
            }
        }

        if candidates.is_empty() {
            return None;
        }

        Some(Self {
            timestamp: timestamp?,
            candidates,
        })
    }
}

/// Compare without short-circuiting so the runtime does not leak how many
/// leading bytes matched.
fn matches_constant_time(expected: &[u8], candidate: &[u8]) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }

    expected
        .iter()
        .zip(candidate)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
