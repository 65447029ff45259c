//! Driving port for reading trade lists and card relationships.

use async_trait::async_trait;

use crate::domain::{CardId, Error, TradeList, TradingCode, UserId};

/// Another trader listed against a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraderSummary {
    /// The trader.
    pub user_id: UserId,
    /// Trading code, when shared.
    pub trading_code: Option<TradingCode>,
    /// The trader's opposite list: the wishlist for offerers, the offered
    /// cards for wanters. This is what a counter-offer would draw from.
    pub cards: Vec<CardId>,
}

/// Who offers and who wants a card, excluding the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardTraders {
    /// Traders offering the card, with their wishlists.
    pub have: Vec<TraderSummary>,
    /// Traders wanting the card, with their offered cards.
    pub want: Vec<TraderSummary>,
}

/// The viewer's own relationship with a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardTradeStatus {
    /// Card is on the viewer's offered list.
    pub is_marked_for_trade: bool,
    /// Card is on the viewer's wishlist.
    pub is_wishlisted: bool,
}

/// Domain use-case port for trade list reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeListQuery: Send + Sync {
    /// The trader's list. Empty when the trader has no record.
    async fn list(&self, user_id: &UserId, list: TradeList) -> Result<Vec<CardId>, Error>;

    /// Traders offering or wanting `card_id`, excluding `viewer`. Empty when
    /// the card has no relationship record.
    async fn card_traders(&self, card_id: &CardId, viewer: &UserId)
    -> Result<CardTraders, Error>;

    /// The viewer's own status for `card_id`.
    async fn card_status(&self, card_id: &CardId, viewer: &UserId)
    -> Result<CardTradeStatus, Error>;
}
