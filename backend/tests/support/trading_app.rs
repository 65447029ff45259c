//! In-memory tradepost application for HTTP-level integration tests.
//!
//! Wires the real services over `InMemoryTradingStore`, with HS256 session
//! tokens and a webhook verifier keyed by the shared test secrets.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tradepost::Trace;
use tradepost::domain::ports::CatalogueRepository;
use tradepost::domain::{CardNumber, CatalogueCard, PackId};
use tradepost::inbound::http::configure_api;
use tradepost::inbound::http::identity::SessionVerifier;
use tradepost::inbound::http::state::{HttpState, HttpStatePorts};
use tradepost::inbound::http::webhook_signature::{
    WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER, WebhookVerifier,
};
use tradepost::outbound::memory::InMemoryTradingStore;
use tradepost::test_support::{
    FixtureClock, TEST_SESSION_SECRET, TEST_WEBHOOK_SECRET, session_token, signed_webhook_headers,
};

/// Instant the fixture clock starts at.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Store and state behind one test application.
pub struct TradingApp {
    pub store: Arc<InMemoryTradingStore>,
    pub clock: FixtureClock,
    pub state: web::Data<HttpState>,
}

impl TradingApp {
    /// Fresh store seeded with a small catalogue.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryTradingStore::new());
        store
            .upsert_cards(&sample_catalogue())
            .await
            .expect("seed catalogue");
        let clock = FixtureClock::at(fixed_now());
        let ports = HttpStatePorts::from_repositories(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(clock.clone()),
        );
        let sessions =
            SessionVerifier::from_secret(TEST_SESSION_SECRET, None).expect("session verifier");
        let webhooks = WebhookVerifier::new(TEST_WEBHOOK_SECRET).expect("webhook verifier");
        let state = HttpState::new(ports, sessions, Arc::new(clock.clone()))
            .with_webhook_verifier(webhooks);
        Self {
            store,
            clock,
            state: web::Data::new(state),
        }
    }

    /// Actix application mounting the API under `/api/v1`.
    ///
    /// The returned app owns its own handle on the state, so it does not
    /// borrow the harness.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let state = self.state.clone();
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
    }
}

fn catalogue_card(pack: &str, number: &str, name: &str, pack_name: &str) -> CatalogueCard {
    CatalogueCard::new(
        PackId::new(pack).expect("pack"),
        CardNumber::new(number).expect("number"),
        name,
        format!("https://cards.example/{pack}/{number}.png"),
        pack_name,
        "◊",
    )
    .expect("catalogue card")
}

/// Cards across two packs, deliberately out of order.
pub fn sample_catalogue() -> Vec<CatalogueCard> {
    vec![
        catalogue_card("mythical-island-a1a", "1", "Mew", "Mythical Islands A2"),
        catalogue_card("genetic-apex-a1", "10", "Caterpie", "Genetic Apex A1"),
        catalogue_card("genetic-apex-a1", "2", "Ivysaur", "Genetic Apex A1"),
        catalogue_card("genetic-apex-a1", "1", "Bulbasaur", "Genetic Apex A1"),
    ]
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        AUTHORIZATION,
        format!("Bearer {}", session_token(user_id, TEST_SESSION_SECRET, None)),
    )
}

/// Build a signed identity webhook request for `body`.
pub fn webhook_request(body: &Value, at: DateTime<Utc>) -> actix_test::TestRequest {
    let payload = serde_json::to_vec(body).expect("serialise event");
    let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, &payload, at);
    actix_test::TestRequest::post()
        .uri("/api/v1/webhooks/identity")
        .insert_header((WEBHOOK_ID_HEADER, headers.id))
        .insert_header((WEBHOOK_TIMESTAMP_HEADER, headers.timestamp))
        .insert_header((WEBHOOK_SIGNATURE_HEADER, headers.signature))
        .insert_header(("content-type", "application/json"))
        .set_payload(payload)
}
