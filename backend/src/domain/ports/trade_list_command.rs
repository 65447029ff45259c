//! Driving port for editing a trader's lists.

use async_trait::async_trait;

use crate::domain::{CardId, Error, ListAction, TradeList, UserId};

/// Domain use-case port for marking and unmarking cards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeListCommand: Send + Sync {
    /// Add or remove `card_id` on the trader's `list` and the card's reverse
    /// index in one atomic step. Returns the trader's list after the change.
    async fn change(
        &self,
        user_id: &UserId,
        list: TradeList,
        action: ListAction,
        card_id: &CardId,
    ) -> Result<Vec<CardId>, Error>;
}
