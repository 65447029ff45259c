//! Per-card reverse index of traders offering or wanting a card.

use super::card::CardId;
use super::membership::{ListAction, TradeList, apply_list_action};
use super::trader::UserId;

/// Reverse index for one card.
///
/// ## Invariants
/// - A trader is in `have` iff the card is in that trader's `cards_for_trade`.
/// - A trader is in `want` iff the card is in that trader's `wishlist`.
///
/// Records are created lazily on the first membership change and never
/// deleted, so an empty record is a normal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRelationship {
    /// Card this record indexes.
    pub card_id: CardId,
    /// Traders offering the card.
    pub have: Vec<UserId>,
    /// Traders wanting the card.
    pub want: Vec<UserId>,
}

impl CardRelationship {
    /// Empty record for `card_id`.
    #[must_use]
    pub fn empty(card_id: CardId) -> Self {
        Self {
            card_id,
            have: Vec::new(),
            want: Vec::new(),
        }
    }

    /// Borrow the member list mirroring `list`.
    #[must_use]
    pub fn members(&self, list: TradeList) -> &[UserId] {
        match list {
            TradeList::ForTrade => &self.have,
            TradeList::Wishlist => &self.want,
        }
    }

    /// Apply a membership change for `user`, returning whether it changed.
    pub fn apply(&mut self, list: TradeList, action: ListAction, user: &UserId) -> bool {
        let members = match list {
            TradeList::ForTrade => &mut self.have,
            TradeList::Wishlist => &mut self.want,
        };
        apply_list_action(members, action, user)
    }

    /// Copy of this record with `viewer` removed from both lists.
    #[must_use]
    pub fn without(&self, viewer: &UserId) -> Self {
        Self {
            card_id: self.card_id.clone(),
            have: self.have.iter().filter(|id| *id != viewer).cloned().collect(),
            want: self.want.iter().filter(|id| *id != viewer).cloned().collect(),
        }
    }
}
