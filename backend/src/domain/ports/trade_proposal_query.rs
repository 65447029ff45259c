//! Driving port for reading a trader's trade log with card details.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CatalogueCard, Error, TradeMessage, UserId};

/// Trade log entry with both cards resolved against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTradeEntry {
    /// The other trader.
    pub friend_id: UserId,
    /// Card the log owner gives.
    pub card_to_trade: CatalogueCard,
    /// Card the log owner receives.
    pub card_to_receive: CatalogueCard,
    /// Message attached by the proposer.
    pub message: TradeMessage,
    /// Proposal creation time.
    pub timestamp: DateTime<Utc>,
}

/// Resolved trade log, oldest entries first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedTradeLog {
    /// Proposals the trader sent.
    pub proposed: Vec<ResolvedTradeEntry>,
    /// Proposals the trader received.
    pub requests: Vec<ResolvedTradeEntry>,
}

/// Domain use-case port for trade log reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeProposalQuery: Send + Sync {
    /// The trader's resolved log. Not found when the trader has no record.
    async fn trades(&self, user_id: &UserId) -> Result<ResolvedTradeLog, Error>;
}
