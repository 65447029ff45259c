//! Test utilities for the tradepost crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`):
//! a fixed clock, session token minting and webhook signing that match the
//! production verifiers.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Local, Utc};
use jsonwebtoken::{EncodingKey, Header};
use mockable::Clock;
use serde::Serialize;

use crate::inbound::http::webhook_signature::{WebhookHeaders, WebhookVerifier};

/// HS256 secret used by test session verifiers.
pub const TEST_SESSION_SECRET: &[u8] = b"tradepost-test-session-secret";

/// Webhook secret used by test deployments.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_dHJhZGVwb3N0LXRlc3Qtd2ViaG9vaw==";

/// Clock pinned to a settable instant.
#[derive(Debug, Clone)]
pub struct FixtureClock(Arc<Mutex<DateTime<Utc>>>);

impl FixtureClock {
    /// Clock reporting `now` until moved.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
}

/// Mint an HS256 session token for `user_id`, valid for one hour.
///
/// # Panics
/// When encoding fails, which only happens with a broken crypto backend.
#[must_use]
pub fn session_token(user_id: &str, secret: &[u8], issuer: Option<&str>) -> String {
    let claims = TestClaims {
        sub: user_id,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
        iss: issuer,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap_or_else(|error| panic!("encode session token: {error}"))
}

/// Build signed webhook headers for `body` at `timestamp`.
///
/// # Panics
/// When `secret` does not decode.
#[must_use]
pub fn signed_webhook_headers(secret: &str, body: &[u8], timestamp: DateTime<Utc>) -> WebhookHeaders {
    let verifier = WebhookVerifier::new(secret)
        .unwrap_or_else(|error| panic!("decode webhook secret: {error}"));
    let id = format!("msg_{}", timestamp.timestamp_millis());
    let timestamp = timestamp.timestamp().to_string();
    WebhookHeaders {
        signature: verifier.sign(&id, &timestamp, body),
        id,
        timestamp,
    }
}
