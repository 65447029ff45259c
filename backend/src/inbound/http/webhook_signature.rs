//! Signature checks for identity-provider webhooks.
//!
//! The provider signs `"{id}.{timestamp}.{body}"` with HMAC-SHA256 using a
//! base64 secret published as `whsec_<base64>`. The `svix-signature` header
//! lists one or more space-separated `v1,<base64>` signatures; any match
//! accepts the request. Timestamps outside [`TIMESTAMP_TOLERANCE_SECS`] of
//! the injected clock are rejected to bound replays.

use actix_web::HttpRequest;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the unique message id.
pub const WEBHOOK_ID_HEADER: &str = "svix-id";
/// Header carrying the unix-seconds send time.
pub const WEBHOOK_TIMESTAMP_HEADER: &str = "svix-timestamp";
/// Header carrying the signature list.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "svix-signature";
/// Allowed distance between the message timestamp and now.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// The configured secret could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("webhook secret must be base64, optionally prefixed with whsec_")]
pub struct WebhookSecretError;

/// Reasons a webhook request fails verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookVerificationError {
    /// Timestamp header is not an integer.
    #[error("invalid webhook timestamp")]
    InvalidTimestamp,
    /// Timestamp lies outside the tolerance window.
    #[error("webhook timestamp outside tolerance")]
    TimestampOutOfTolerance,
    /// No listed signature matched.
    #[error("invalid webhook signature")]
    InvalidSignature,
}

/// Signature headers of one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    /// Message id.
    pub id: String,
    /// Raw timestamp header.
    pub timestamp: String,
    /// Raw signature list.
    pub signature: String,
}

impl WebhookHeaders {
    /// Read all three headers. `None` when any is missing or not UTF-8.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let header = |name: &str| -> Option<String> {
            req.headers()
                .get(name)?
                .to_str()
                .ok()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        Some(Self {
            id: header(WEBHOOK_ID_HEADER)?,
            timestamp: header(WEBHOOK_TIMESTAMP_HEADER)?,
            signature: header(WEBHOOK_SIGNATURE_HEADER)?,
        })
    }
}

/// HMAC verifier bound to one webhook secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    keyed: HmacSha256,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Decode a `whsec_<base64>` secret.
    pub fn new(secret: &str) -> Result<Self, WebhookSecretError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);
        let key = Zeroizing::new(STANDARD.decode(encoded).map_err(|_| WebhookSecretError)?);
        if key.is_empty() {
            return Err(WebhookSecretError);
        }
        let keyed = <HmacSha256 as Mac>::new_from_slice(&key).map_err(|_| WebhookSecretError)?;
        Ok(Self { keyed })
    }

    fn mac(&self, id: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }

    /// Produce the `v1,<base64>` signature for a delivery.
    #[must_use]
    pub fn sign(&self, id: &str, timestamp: &str, body: &[u8]) -> String {
        let digest = self.mac(id, timestamp, body).finalize().into_bytes();
        format!("{SIGNATURE_VERSION},{}", STANDARD.encode(digest))
    }

    /// Check the timestamp window, then every listed `v1` signature.
    pub fn verify(
        &self,
        headers: &WebhookHeaders,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), WebhookVerificationError> {
        let sent: i64 = headers
            .timestamp
            .parse()
            .map_err(|_| WebhookVerificationError::InvalidTimestamp)?;
        if now.timestamp().abs_diff(sent) > TIMESTAMP_TOLERANCE_SECS.unsigned_abs() {
            return Err(WebhookVerificationError::TimestampOutOfTolerance);
        }

        let mac = self.mac(&headers.id, &headers.timestamp, body);
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
            .any(|candidate| mac.clone().verify_slice(&candidate).is_ok());
        if matched {
            Ok(())
        } else {
            Err(WebhookVerificationError::InvalidSignature)
        }
    }
}
