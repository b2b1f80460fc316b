//! HMAC-SHA256 request signatures for the tracking API.
//!
//! Both tokens are keyed by the shared secret and bound to the epoch second at
//! which the request is handled, so they go stale as soon as the upstream
//! verifier's freshness window passes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::TrackError;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `message` keyed by `key` (always 64 chars).
pub fn hmac_hex(key: &[u8], message: &[u8]) -> Result<String, TrackError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| TrackError::Signing(format!("HMAC error: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Whole seconds since the Unix epoch, truncated.
pub fn current_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Tokens for one upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub epoch: i64,
    pub epoch_token: String,
    pub order_token: String,
}

impl Signature {
    pub fn sign(secret: &str, order_id: &str, epoch: i64) -> Result<Self, TrackError> {
        let key = secret.as_bytes();
        let epoch_token = hmac_hex(key, epoch.to_string().as_bytes())?;
        let order_token = hmac_hex(key, format!("{}:{}", order_id, epoch).as_bytes())?;

        Ok(Self {
            epoch,
            epoch_token,
            order_token,
        })
    }
}
