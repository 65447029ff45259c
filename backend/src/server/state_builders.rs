//! Builds the HTTP state from the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use tradepost::inbound::http::state::{HttpState, HttpStatePorts};
use tradepost::outbound::persistence::{
    DieselCatalogueRepository, DieselTradeListRepository, DieselTradeProposalRepository,
    DieselTraderRepository,
};

use super::ServerConfig;
use super::config::StorageBackend;

fn build_ports(storage: &StorageBackend, clock: Arc<dyn Clock>) -> HttpStatePorts {
    match storage {
        StorageBackend::Memory(store) => HttpStatePorts::from_repositories(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock,
        ),
        StorageBackend::Postgres(pool) => HttpStatePorts::from_repositories(
            Arc::new(DieselTraderRepository::new(pool.clone())),
            Arc::new(DieselTradeListRepository::new(pool.clone())),
            Arc::new(DieselTradeProposalRepository::new(pool.clone())),
            Arc::new(DieselCatalogueRepository::new(pool.clone())),
            clock,
        ),
    }
}

/// Wire services over the configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = build_ports(&config.storage, clock.clone());
    let mut state = HttpState::new(ports, config.sessions.clone(), clock);
    if let Some(verifier) = config.webhooks.clone() {
        state = state.with_webhook_verifier(verifier);
    }
    web::Data::new(state)
}
