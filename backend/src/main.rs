//! Tradepost entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, StorageBackend, create_server};
use tradepost::catalogue_import::import_catalogue_file;
use tradepost::inbound::http::health::HealthState;
use tradepost::inbound::http::identity::SessionVerifier;
use tradepost::inbound::http::webhook_signature::WebhookVerifier;
use tradepost::outbound::memory::InMemoryTradingStore;
use tradepost::outbound::persistence::{
    DbPool, DieselCatalogueRepository, PoolConfig, run_pending_migrations,
};
use tradepost::settings::{SessionKeySource, TradepostSettings};

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

fn build_session_verifier(settings: &TradepostSettings) -> std::io::Result<SessionVerifier> {
    let issuer = settings.session_issuer.as_deref();
    let key = settings
        .session_key()
        .map_err(|err| startup_error("session configuration", err))?;
    match key {
        SessionKeySource::PublicKey(path) => {
            let pem = std::fs::read(path).map_err(|err| {
                startup_error(&format!("read session key {}", path.display()), err)
            })?;
            SessionVerifier::from_rsa_pem(&pem, issuer)
        }
        SessionKeySource::Secret(secret) => SessionVerifier::from_secret(secret.as_bytes(), issuer),
    }
    .map_err(|err| startup_error("session key", err))
}

fn build_webhook_verifier(settings: &TradepostSettings) -> std::io::Result<Option<WebhookVerifier>> {
    match settings.webhook_secret.as_deref() {
        Some(secret) => WebhookVerifier::new(secret)
            .map(Some)
            .map_err(|err| startup_error("webhook secret", err)),
        None => {
            warn!("no webhook secret configured; identity webhook will reject events");
            Ok(None)
        }
    }
}

async fn build_storage(settings: &TradepostSettings) -> std::io::Result<StorageBackend> {
    let Some(database_url) = settings.database_url.clone() else {
        warn!("no database configured; using in-memory storage");
        return Ok(StorageBackend::Memory(Arc::new(InMemoryTradingStore::new())));
    };

    if settings.run_migrations {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|err| startup_error("migration task", err))?
            .map_err(|err| startup_error("migrations", err))?;
        info!(applied, "database schema up to date");
    }

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| startup_error("database pool", err))?;
    Ok(StorageBackend::Postgres(pool))
}

async fn load_catalogue(
    settings: &TradepostSettings,
    storage: &StorageBackend,
) -> std::io::Result<()> {
    let Some(path) = settings.catalogue_path.as_deref() else {
        info!(reason = "no catalogue_path", "catalogue import skipped");
        return Ok(());
    };
    let result = match storage {
        StorageBackend::Memory(store) => import_catalogue_file(path, store.as_ref()).await,
        StorageBackend::Postgres(pool) => {
            import_catalogue_file(path, &DieselCatalogueRepository::new(pool.clone())).await
        }
    };
    result
        .map(|_| ())
        .map_err(|err| startup_error("catalogue import", err))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TradepostSettings::load().map_err(|err| startup_error("settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("settings", err))?;
    let sessions = build_session_verifier(&settings)?;
    let webhooks = build_webhook_verifier(&settings)?;
    let storage = build_storage(&settings).await?;
    load_catalogue(&settings, &storage).await?;
    let health_state = web::Data::new(HealthState::new(storage.kind()));

    let config = ServerConfig::new(bind_addr, storage, sessions).with_webhooks(webhooks);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::metrics::make_metrics());

    info!(%bind_addr, "starting tradepost");
    let server = create_server(health_state.clone(), config)?;

    // Actix handles the signal itself; this only flips the probes.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            health_state.mark_draining();
            info!("shutdown requested; probes now report draining");
        }
    });

    server.await
}
