//! Port for the dual-list trade bookkeeping.
//!
//! A membership change edits a trader's list and the card's reverse index in
//! one atomic operation. Adapters must lock or serialise both records, run
//! [`TraderProfile::apply_membership`] and [`CardRelationship::apply`], and
//! persist both results or neither.

use async_trait::async_trait;

use crate::domain::{
    CardId, CardRelationship, ListAction, MembershipRejection, TradeList, TraderProfile, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trade list repository adapters.
    pub enum TradeListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "trade list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "trade list repository query failed: {message}",
        /// The trader record does not exist.
        TraderNotFound { user_id: String } =>
            "trader {user_id} not found",
        /// The trader profile refused the change.
        Rejected { reason: MembershipRejection } =>
            "membership change rejected: {reason}",
    }
}

/// One membership change applied to both sides of the bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    /// Trader whose list changes.
    pub user_id: UserId,
    /// Card being added or removed.
    pub card_id: CardId,
    /// List pair affected.
    pub list: TradeList,
    /// Add or remove.
    pub action: ListAction,
}

/// Apply a change to in-memory copies of both records.
///
/// Shared by adapters so the list arithmetic is identical everywhere. The
/// relationship is only touched when the trader accepts the change.
///
/// # Errors
/// [`TradeListRepositoryError::Rejected`] when the trader profile refuses.
pub fn apply_membership_change(
    change: &MembershipChange,
    trader: &mut TraderProfile,
    relationship: &mut CardRelationship,
) -> Result<(), TradeListRepositoryError> {
    trader
        .apply_membership(change.list, change.action, &change.card_id)
        .map_err(TradeListRepositoryError::rejected)?;
    relationship.apply(change.list, change.action, &change.user_id);
    Ok(())
}

/// Atomic trade list storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeListRepository: Send + Sync {
    /// Apply `change` to the trader and the card relationship atomically.
    ///
    /// Returns the trader profile as stored after the change. The card
    /// relationship record is created when missing.
    async fn apply_change(
        &self,
        change: &MembershipChange,
    ) -> Result<TraderProfile, TradeListRepositoryError>;

    /// Fetch a card relationship record.
    async fn find_relationship(
        &self,
        card_id: &CardId,
    ) -> Result<Option<CardRelationship>, TradeListRepositoryError>;
}
