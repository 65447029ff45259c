//! Server configuration loaded via OrthoConfig.
//!
//! Values layer from CLI flags, `TRADEPOST_*` environment variables and an
//! optional config file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Neither a public key nor a shared secret was configured.
    #[error("session verification needs session_public_key_path or session_secret")]
    MissingSessionKey,
}

/// How session tokens are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKeySource<'a> {
    /// RS256 with the PEM public key at this path.
    PublicKey(&'a Path),
    /// HS256 with a shared secret.
    Secret(&'a str),
}

/// Configuration values for the tradepost server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRADEPOST")]
pub struct TradepostSettings {
    /// HTTP listen address. Defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Apply embedded migrations on start when a database is configured.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// JSON catalogue loaded into the catalogue store at start-up.
    pub catalogue_path: Option<PathBuf>,
    /// `whsec_` secret for the identity webhook.
    pub webhook_secret: Option<String>,
    /// RS256 PEM public key for session tokens.
    pub session_public_key_path: Option<PathBuf>,
    /// HS256 secret for session tokens, used when no PEM key is given.
    pub session_secret: Option<String>,
    /// Expected `iss` claim.
    pub session_issuer: Option<String>,
}

impl TradepostSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Session key material; the PEM key wins over the shared secret.
    pub fn session_key(&self) -> Result<SessionKeySource<'_>, SettingsError> {
        if let Some(path) = self.session_public_key_path.as_deref() {
            return Ok(SessionKeySource::PublicKey(path));
        }
        self.session_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(SessionKeySource::Secret)
            .ok_or(SettingsError::MissingSessionKey)
    }
}
