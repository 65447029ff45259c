//! Driving port for proposing trades.

use async_trait::async_trait;

use crate::domain::{CardId, Error, TradeEntry, TradeMessage, UserId};

/// Validated proposal input. The timestamp is assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeTradeRequest {
    /// Trader sending the proposal.
    pub proposer: UserId,
    /// Trader receiving the proposal.
    pub counterparty: UserId,
    /// Card the proposer gives.
    pub card_to_trade: CardId,
    /// Card the proposer asks for.
    pub card_to_receive: CardId,
    /// Free-text note.
    pub message: TradeMessage,
}

/// Domain use-case port for proposing trades.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeProposalCommand: Send + Sync {
    /// Record the proposal on both traders. Returns the proposer's entry.
    async fn propose(&self, request: ProposeTradeRequest) -> Result<TradeEntry, Error>;
}
