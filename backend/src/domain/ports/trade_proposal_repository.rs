//! Port for the append-only trade log.

use async_trait::async_trait;

use crate::domain::{TradeLog, TradeProposal, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trade proposal repository adapters.
    pub enum TradeProposalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "trade proposal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "trade proposal repository query failed: {message}",
        /// One of the two traders does not exist.
        TraderNotFound { user_id: String } =>
            "trader {user_id} not found",
    }
}

/// Trade log storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeProposalRepository: Send + Sync {
    /// Append the proposer's `proposed` entry and the counterparty's
    /// `requests` entry atomically.
    ///
    /// Fails with [`TradeProposalRepositoryError::TraderNotFound`] when either
    /// trader is missing, in which case nothing is written.
    async fn record(&self, proposal: &TradeProposal) -> Result<(), TradeProposalRepositoryError>;

    /// Fetch a trader's log, oldest entries first. `None` when the trader
    /// does not exist.
    async fn trade_log(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TradeLog>, TradeProposalRepositoryError>;
}
