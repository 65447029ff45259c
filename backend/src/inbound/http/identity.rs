//! Caller identity for authenticated endpoints.
//!
//! The identity provider issues a signed JWT per browser session. It arrives
//! either as a bearer token or, for same-site browser calls, in the
//! provider's `__session` cookie. Handlers take a [`Caller`] argument and
//! never see the token.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Cookie set by the identity provider's browser SDK.
pub const SESSION_COOKIE: &str = "__session";

/// Failure to build a [`SessionVerifier`] from configured key material.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    /// The PEM public key could not be parsed.
    #[error("invalid RS256 public key: {0}")]
    InvalidPublicKey(#[source] jsonwebtoken::errors::Error),
    /// The shared secret was empty.
    #[error("session secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
}

/// Verifies session tokens and yields the caller's identity.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    fn new(key: DecodingKey, algorithm: Algorithm, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self { key, validation }
    }

    /// Verify RS256 tokens against a PEM-encoded public key.
    pub fn from_rsa_pem(pem: &[u8], issuer: Option<&str>) -> Result<Self, SessionKeyError> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(SessionKeyError::InvalidPublicKey)?;
        Ok(Self::new(key, Algorithm::RS256, issuer))
    }

    /// Verify HS256 tokens against a shared secret.
    pub fn from_secret(secret: &[u8], issuer: Option<&str>) -> Result<Self, SessionKeyError> {
        if secret.is_empty() {
            return Err(SessionKeyError::EmptySecret);
        }
        Ok(Self::new(
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
            issuer,
        ))
    }

    /// Verify `token` and return the `sub` claim as a user id.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|error| {
                debug!(%error, "session token rejected");
                Error::unauthorized("invalid session token")
            })?;
        UserId::new(data.claims.sub).map_err(|error| {
            debug!(%error, "session token subject is not a valid user id");
            Error::unauthorized("invalid session token")
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

fn session_token(req: &HttpRequest) -> Option<String> {
    bearer_token(req).or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty())
    })
}

/// Authenticated caller, extracted from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl Caller {
    /// The caller's identity.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    fn extract(req: &HttpRequest) -> Result<Self, Error> {
        let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
            Error::internal("HTTP state missing from application data")
        })?;
        let token = session_token(req).ok_or_else(|| Error::unauthorized("login required"))?;
        state.sessions.verify(&token).map(Self)
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
