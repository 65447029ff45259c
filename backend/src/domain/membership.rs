//! List-membership arithmetic shared by trader profiles and card relationships.
//!
//! Both sides of the trade bookkeeping hold ordered lists of unique members.
//! Additions append at the end so clients see cards in the order they were
//! marked; removals drop every occurrence so legacy duplicates heal.

use serde::{Deserialize, Serialize};

/// Which pair of lists a membership change targets.
///
/// Each variant names one list on the trader profile and its reverse index
/// on the card relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeList {
    /// `cardsForTrade` on the trader, `have` on the card.
    ForTrade,
    /// `wishlist` on the trader, `want` on the card.
    Wishlist,
}

impl TradeList {
    /// Stable lowercase label used in logs and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForTrade => "for_trade",
            Self::Wishlist => "wishlist",
        }
    }
}

impl std::fmt::Display for TradeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListAction {
    /// Ensure the member is present.
    Add,
    /// Ensure the member is absent.
    Remove,
}

/// Apply `action` for `member` to `list`, returning whether the list changed.
///
/// # Examples
/// ```
/// use tradepost::domain::{ListAction, apply_list_action};
///
/// let mut list = vec!["a".to_owned()];
/// assert!(!apply_list_action(&mut list, ListAction::Add, &"a".to_owned()));
/// assert!(apply_list_action(&mut list, ListAction::Add, &"b".to_owned()));
/// assert!(apply_list_action(&mut list, ListAction::Remove, &"a".to_owned()));
/// assert_eq!(list, vec!["b".to_owned()]);
/// ```
pub fn apply_list_action<T>(list: &mut Vec<T>, action: ListAction, member: &T) -> bool
where
    T: PartialEq + Clone,
{
    match action {
        ListAction::Add => {
            if list.contains(member) {
                false
            } else {
                list.push(member.clone());
                true
            }
        }
        ListAction::Remove => {
            let before = list.len();
            list.retain(|existing| existing != member);
            list.len() != before
        }
    }
}
