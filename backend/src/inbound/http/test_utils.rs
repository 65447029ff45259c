//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockCatalogueQuery, MockIdentitySyncCommand, MockTradeListCommand, MockTradeListQuery,
    MockTradeProposalCommand, MockTradeProposalQuery, MockTradingCodeCommand,
};
use crate::inbound::http::identity::SessionVerifier;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::webhook_signature::WebhookVerifier;
use crate::test_support::{FixtureClock, TEST_WEBHOOK_SECRET, session_token};

pub use crate::test_support::TEST_SESSION_SECRET;

/// Fixed instant used as "now" by handler tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp")
}

/// Session token for `user_id`, signed with [`TEST_SESSION_SECRET`].
pub fn session_token_for(user_id: &str) -> String {
    session_token(user_id, TEST_SESSION_SECRET, None)
}

/// `Authorization` header authenticating `user_id`.
pub fn bearer(user_id: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", session_token_for(user_id)))
}

/// Builds [`HttpState`] from mocks. Unset ports get mocks without
/// expectations, so any unexpected call fails the test.
#[derive(Default)]
pub struct TestStateBuilder {
    catalogue: Option<MockCatalogueQuery>,
    trade_lists: Option<MockTradeListCommand>,
    trade_lists_query: Option<MockTradeListQuery>,
    trading_codes: Option<MockTradingCodeCommand>,
    trades: Option<MockTradeProposalCommand>,
    trades_query: Option<MockTradeProposalQuery>,
    identity_sync: Option<MockIdentitySyncCommand>,
    webhooks: bool,
}

pub fn state_builder() -> TestStateBuilder {
    TestStateBuilder::default()
}

impl TestStateBuilder {
    pub fn catalogue(mut self, mock: MockCatalogueQuery) -> Self {
        self.catalogue = Some(mock);
        self
    }

    pub fn trade_lists(mut self, mock: MockTradeListCommand) -> Self {
        self.trade_lists = Some(mock);
        self
    }

    pub fn trade_lists_query(mut self, mock: MockTradeListQuery) -> Self {
        self.trade_lists_query = Some(mock);
        self
    }

    pub fn trading_codes(mut self, mock: MockTradingCodeCommand) -> Self {
        self.trading_codes = Some(mock);
        self
    }

    pub fn trades(mut self, mock: MockTradeProposalCommand) -> Self {
        self.trades = Some(mock);
        self
    }

    pub fn trades_query(mut self, mock: MockTradeProposalQuery) -> Self {
        self.trades_query = Some(mock);
        self
    }

    pub fn identity_sync(mut self, mock: MockIdentitySyncCommand) -> Self {
        self.identity_sync = Some(mock);
        self
    }

    /// Enable the webhook with [`TEST_WEBHOOK_SECRET`].
    pub fn with_webhooks(mut self) -> Self {
        self.webhooks = true;
        self
    }

    pub fn build(self) -> HttpState {
        let ports = HttpStatePorts {
            catalogue: Arc::new(self.catalogue.unwrap_or_default()),
            trade_lists: Arc::new(self.trade_lists.unwrap_or_default()),
            trade_lists_query: Arc::new(self.trade_lists_query.unwrap_or_default()),
            trading_codes: Arc::new(self.trading_codes.unwrap_or_default()),
            trades: Arc::new(self.trades.unwrap_or_default()),
            trades_query: Arc::new(self.trades_query.unwrap_or_default()),
            identity_sync: Arc::new(self.identity_sync.unwrap_or_default()),
        };
        let sessions =
            SessionVerifier::from_secret(TEST_SESSION_SECRET, None).expect("session verifier");
        let state = HttpState::new(ports, sessions, Arc::new(FixtureClock::at(fixed_now())));
        if self.webhooks {
            state.with_webhook_verifier(
                WebhookVerifier::new(TEST_WEBHOOK_SECRET).expect("webhook secret"),
            )
        } else {
            state
        }
    }
}
