//! Port for trader record persistence.
//!
//! Covers the single-record operations: lookups, lifecycle changes driven by
//! the identity webhook, and trading-code updates. Operations that touch a
//! trader and a card relationship together live on
//! [`super::TradeListRepository`].

use async_trait::async_trait;

use crate::domain::{TraderProfile, TradingCode, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trader repository adapters.
    pub enum TraderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "trader repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "trader repository query failed: {message}",
    }
}

/// Trader storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TraderRepository: Send + Sync {
    /// Fetch one trader.
    async fn find(&self, id: &UserId) -> Result<Option<TraderProfile>, TraderRepositoryError>;

    /// Fetch every trader in `ids` that exists. Order is unspecified.
    async fn find_many(&self, ids: &[UserId])
    -> Result<Vec<TraderProfile>, TraderRepositoryError>;

    /// Create an empty trader record. Returns `false` when one already exists.
    async fn create_if_absent(&self, id: &UserId) -> Result<bool, TraderRepositoryError>;

    /// Delete a trader and its trade log. Returns `false` when none existed.
    async fn delete(&self, id: &UserId) -> Result<bool, TraderRepositoryError>;

    /// Store a trading code, creating the trader record when missing.
    async fn save_trading_code(
        &self,
        id: &UserId,
        code: &TradingCode,
    ) -> Result<(), TraderRepositoryError>;
}
