//! Webhook signatures: hex-encoded HMAC-SHA512 over the raw request body.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::gateway::SecretKey;

type HmacSha512 = Hmac<Sha512>;

/// Compute the signature the provider sends for `body`.
#[must_use]
pub fn sign_webhook(secret: &SecretKey, body: &[u8]) -> String {
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.expose().as_bytes()) else {
        return String::new();
    };

    mac.update(body);

    hex::encode(mac.finalize().into_bytes())
}

/// Check `signature` against `body` in constant time.
///
/// An empty secret never verifies.
#[must_use]
pub fn verify_webhook_signature(secret: &SecretKey, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha512::new_from_slice(secret.expose().as_bytes()) else {
        return false;
    };

    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}
