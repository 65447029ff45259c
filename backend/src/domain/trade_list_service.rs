//! Trade list service: the offered-card list and wishlist bookkeeping.
//!
//! Every change goes through [`TradeListRepository::apply_change`], which
//! edits the trader's list and the card's reverse index atomically.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{
    CardTradeStatus, CardTraders, MembershipChange, TradeListCommand, TradeListQuery,
    TradeListRepository, TradeListRepositoryError, TraderRepository, TraderRepositoryError,
    TraderSummary,
};
use crate::domain::{
    CardId, Error, ListAction, MembershipRejection, TradeList, TraderProfile, UserId,
};

pub(crate) fn map_trader_error(error: TraderRepositoryError) -> Error {
    error!(%error, "trader repository failure");
    Error::internal(format!("trader repository error: {error}"))
}

fn map_trade_list_error(error: TradeListRepositoryError) -> Error {
    match error {
        TradeListRepositoryError::TraderNotFound { user_id } => {
            debug!(%user_id, "trade list change for unknown trader");
            Error::not_found("User not found")
        }
        TradeListRepositoryError::Rejected {
            reason: MembershipRejection::TradingCodeRequired,
        } => Error::invalid_request(MembershipRejection::TradingCodeRequired.to_string()),
        other => {
            error!(error = %other, "trade list repository failure");
            Error::internal(format!("trade list repository error: {other}"))
        }
    }
}

/// Trade list service implementing [`TradeListCommand`] and [`TradeListQuery`].
#[derive(Clone)]
pub struct TradeListService<T, L> {
    traders: Arc<T>,
    lists: Arc<L>,
}

impl<T, L> TradeListService<T, L> {
    /// Create a new service with the given repositories.
    pub fn new(traders: Arc<T>, lists: Arc<L>) -> Self {
        Self { traders, lists }
    }
}

fn summarise(profile: TraderProfile, opposite: TradeList) -> TraderSummary {
    let cards = profile.list(opposite).to_vec();
    TraderSummary {
        user_id: profile.id,
        trading_code: profile.trading_code,
        cards,
    }
}

// Keeps the relationship order; members without a trader record are dropped.
fn summaries_in_order(
    members: &[UserId],
    profiles: &HashMap<UserId, TraderProfile>,
    opposite: TradeList,
) -> Vec<TraderSummary> {
    members
        .iter()
        .filter_map(|id| profiles.get(id).cloned())
        .map(|profile| summarise(profile, opposite))
        .collect()
}

#[async_trait]
impl<T, L> TradeListCommand for TradeListService<T, L>
where
    T: TraderRepository,
    L: TradeListRepository,
{
    async fn change(
        &self,
        user_id: &UserId,
        list: TradeList,
        action: ListAction,
        card_id: &CardId,
    ) -> Result<Vec<CardId>, Error> {
        let change = MembershipChange {
            user_id: user_id.clone(),
            card_id: card_id.clone(),
            list,
            action,
        };
        let profile = self
            .lists
            .apply_change(&change)
            .await
            .map_err(map_trade_list_error)?;
        debug!(%user_id, %card_id, %list, ?action, "trade list updated");
        Ok(profile.list(list).to_vec())
    }
}

#[async_trait]
impl<T, L> TradeListQuery for TradeListService<T, L>
where
    T: TraderRepository,
    L: TradeListRepository,
{
    async fn list(&self, user_id: &UserId, list: TradeList) -> Result<Vec<CardId>, Error> {
        let profile = self
            .traders
            .find(user_id)
            .await
            .map_err(map_trader_error)?;
        Ok(profile
            .map(|profile| profile.list(list).to_vec())
            .unwrap_or_default())
    }

    async fn card_traders(
        &self,
        card_id: &CardId,
        viewer: &UserId,
    ) -> Result<CardTraders, Error> {
        let Some(relationship) = self
            .lists
            .find_relationship(card_id)
            .await
            .map_err(map_trade_list_error)?
        else {
            return Ok(CardTraders::default());
        };
        let relationship = relationship.without(viewer);

        let mut ids: Vec<UserId> = relationship.have.clone();
        for id in &relationship.want {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        if ids.is_empty() {
            return Ok(CardTraders::default());
        }

        let profiles: HashMap<UserId, TraderProfile> = self
            .traders
            .find_many(&ids)
            .await
            .map_err(map_trader_error)?
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();

        Ok(CardTraders {
            have: summaries_in_order(&relationship.have, &profiles, TradeList::Wishlist),
            want: summaries_in_order(&relationship.want, &profiles, TradeList::ForTrade),
        })
    }

    async fn card_status(
        &self,
        card_id: &CardId,
        viewer: &UserId,
    ) -> Result<CardTradeStatus, Error> {
        let profile = self
            .traders
            .find(viewer)
            .await
            .map_err(map_trader_error)?;
        Ok(profile
            .map(|profile| CardTradeStatus {
                is_marked_for_trade: profile.contains(TradeList::ForTrade, card_id),
                is_wishlisted: profile.contains(TradeList::Wishlist, card_id),
            })
            .unwrap_or_default())
    }
}
