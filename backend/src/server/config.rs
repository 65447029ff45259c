//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use tradepost::inbound::http::health::StorageKind;
use tradepost::inbound::http::identity::SessionVerifier;
use tradepost::inbound::http::webhook_signature::WebhookVerifier;
use tradepost::outbound::memory::InMemoryTradingStore;
use tradepost::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Storage backing the trading ports.
#[derive(Clone)]
pub enum StorageBackend {
    /// Process-local store; state is lost on restart.
    Memory(Arc<InMemoryTradingStore>),
    /// PostgreSQL through the Diesel adapters.
    Postgres(DbPool),
}

impl StorageBackend {
    /// Label reported by the health probes.
    #[must_use]
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Memory(_) => StorageKind::Memory,
            Self::Postgres(_) => StorageKind::Postgres,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: StorageBackend,
    pub(crate) sessions: SessionVerifier,
    pub(crate) webhooks: Option<WebhookVerifier>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration over the chosen storage.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, storage: StorageBackend, sessions: SessionVerifier) -> Self {
        Self {
            bind_addr,
            storage,
            sessions,
            webhooks: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Enable the identity webhook.
    #[must_use]
    pub fn with_webhooks(mut self, verifier: Option<WebhookVerifier>) -> Self {
        self.webhooks = verifier;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
