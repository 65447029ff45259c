//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CatalogueQuery, CatalogueRepository, IdentitySyncCommand, TradeListCommand, TradeListQuery,
    TradeListRepository, TradeProposalCommand, TradeProposalQuery, TradeProposalRepository,
    TraderRepository, TradingCodeCommand,
};
use crate::domain::{
    CatalogueService, IdentitySyncService, TradeListService, TradeProposalService,
    TradingCodeService,
};

use super::identity::SessionVerifier;
use super::webhook_signature::WebhookVerifier;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub trade_lists: Arc<dyn TradeListCommand>,
    pub trade_lists_query: Arc<dyn TradeListQuery>,
    pub trading_codes: Arc<dyn TradingCodeCommand>,
    pub trades: Arc<dyn TradeProposalCommand>,
    pub trades_query: Arc<dyn TradeProposalQuery>,
    pub identity_sync: Arc<dyn IdentitySyncCommand>,
}

impl HttpStatePorts {
    /// Wire the domain services over a set of driven adapters.
    ///
    /// ```rust,ignore
    /// let store = Arc::new(InMemoryTradingStore::new());
    /// let ports = HttpStatePorts::from_repositories(
    ///     store.clone(), store.clone(), store.clone(), store, clock,
    /// );
    /// ```
    pub fn from_repositories<T, L, P, C>(
        traders: Arc<T>,
        lists: Arc<L>,
        proposals: Arc<P>,
        catalogue: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        T: TraderRepository + 'static,
        L: TradeListRepository + 'static,
        P: TradeProposalRepository + 'static,
        C: CatalogueRepository + 'static,
    {
        let trade_lists = Arc::new(TradeListService::new(traders.clone(), lists));
        let trades = Arc::new(TradeProposalService::new(
            proposals,
            catalogue.clone(),
            clock,
        ));
        Self {
            catalogue: Arc::new(CatalogueService::new(catalogue)),
            trade_lists: trade_lists.clone(),
            trade_lists_query: trade_lists,
            trading_codes: Arc::new(TradingCodeService::new(traders.clone())),
            trades: trades.clone(),
            trades_query: trades,
            identity_sync: Arc::new(IdentitySyncService::new(traders)),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub trade_lists: Arc<dyn TradeListCommand>,
    pub trade_lists_query: Arc<dyn TradeListQuery>,
    pub trading_codes: Arc<dyn TradingCodeCommand>,
    pub trades: Arc<dyn TradeProposalCommand>,
    pub trades_query: Arc<dyn TradeProposalQuery>,
    pub identity_sync: Arc<dyn IdentitySyncCommand>,
    /// Session token verification for authenticated endpoints.
    pub sessions: Arc<SessionVerifier>,
    /// Webhook signature verification. `None` when no secret is configured,
    /// in which case the webhook endpoint fails closed.
    pub webhooks: Option<Arc<WebhookVerifier>>,
    /// Clock used for webhook timestamp tolerance.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from the port bundle and the security collaborators.
    pub fn new(ports: HttpStatePorts, sessions: SessionVerifier, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            catalogue,
            trade_lists,
            trade_lists_query,
            trading_codes,
            trades,
            trades_query,
            identity_sync,
        } = ports;
        Self {
            catalogue,
            trade_lists,
            trade_lists_query,
            trading_codes,
            trades,
            trades_query,
            identity_sync,
            sessions: Arc::new(sessions),
            webhooks: None,
            clock,
        }
    }

    /// Enable the identity webhook with the given verifier.
    #[must_use]
    pub fn with_webhook_verifier(mut self, verifier: WebhookVerifier) -> Self {
        self.webhooks = Some(Arc::new(verifier));
        self
    }
}
