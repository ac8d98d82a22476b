//! Stateless bearer-token codec.
//!
//! Non-standard, single-secret construction: `base64url(payload) + "." +
//! base64url(HMAC-SHA256(secret, payload_segment))`. There is no header
//! segment, so this is not interoperable with JWT: do not treat it as one.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies token payloads. `secret` is shared out-of-band with
/// every process minting or checking tokens (here, a single server process).
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        TokenCodec {
            secret: secret.into(),
        }
    }

    /// Adds `iat`/`exp` to `payload`, serializes it with sorted keys and no
    /// whitespace (for byte-for-byte reproducibility), and signs it.
    pub fn create(&self, mut payload: BTreeMap<String, Value>, ttl_seconds: i64) -> String {
        let now = Utc::now().timestamp();
        payload.insert("iat".to_string(), Value::from(now));
        payload.insert("exp".to_string(), Value::from(now + ttl_seconds));

        let payload_json = serde_json::to_vec(&payload).expect("BTreeMap<String, Value> always serializes");
        let payload_segment = URL_SAFE_NO_PAD.encode(payload_json);
        let signature_segment = self.sign(payload_segment.as_bytes());
        format!("{payload_segment}.{signature_segment}")
    }

    /// Splits on the first `.`, recomputes the HMAC, compares in constant
    /// time, decodes the payload, and checks expiry.
    pub fn verify(&self, token: &str) -> Result<BTreeMap<String, Value>, TokenError> {
        let (payload_segment, signature_segment) =
            token.split_once('.').ok_or(TokenError::InvalidFormat)?;

        let expected = self.sign(payload_segment.as_bytes());
        if !constant_time_eq(expected.as_bytes(), signature_segment.as_bytes()) {
            return Err(TokenError::InvalidSignature);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_segment)
            .map_err(|_| TokenError::InvalidFormat)?;
        let payload: BTreeMap<String, Value> =
            serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::InvalidFormat)?;

        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenError::InvalidFormat)?;
        if exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }

    fn sign(&self, payload_segment: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(payload_segment);
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
