//! In-process store implementing every repository port.
//!
//! Used when no database is configured and by end-to-end tests. All state
//! sits behind one async mutex, so each port call is atomic with respect to
//! every other call. That gives membership changes and trade proposals the
//! same all-or-nothing behaviour the Postgres adapters get from transactions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    CardLookup, CatalogueRepository, CatalogueRepositoryError, MembershipChange,
    TradeListRepository, TradeListRepositoryError, TradeProposalRepository,
    TradeProposalRepositoryError, TraderRepository, TraderRepositoryError,
    apply_membership_change,
};
use crate::domain::{
    CardId, CardNumber, CardRelationship, CatalogueCard, PackId, TradeDirection, TradeLog,
    TradeProposal, TraderProfile, TradingCode, UserId,
};

#[derive(Debug, Default)]
struct StoreState {
    traders: HashMap<UserId, TraderProfile>,
    relationships: HashMap<CardId, CardRelationship>,
    logs: HashMap<UserId, TradeLog>,
    catalogue: HashMap<CardId, CatalogueCard>,
}

/// Shared in-memory store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTradingStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryTradingStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TraderRepository for InMemoryTradingStore {
    async fn find(&self, id: &UserId) -> Result<Option<TraderProfile>, TraderRepositoryError> {
        Ok(self.state.lock().await.traders.get(id).cloned())
    }

    async fn find_many(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<TraderProfile>, TraderRepositoryError> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.traders.get(id).cloned())
            .collect())
    }

    async fn create_if_absent(&self, id: &UserId) -> Result<bool, TraderRepositoryError> {
        let mut state = self.state.lock().await;
        if state.traders.contains_key(id) {
            return Ok(false);
        }
        state
            .traders
            .insert(id.clone(), TraderProfile::empty(id.clone()));
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, TraderRepositoryError> {
        let mut state = self.state.lock().await;
        state.logs.remove(id);
        Ok(state.traders.remove(id).is_some())
    }

    async fn save_trading_code(
        &self,
        id: &UserId,
        code: &TradingCode,
    ) -> Result<(), TraderRepositoryError> {
        let mut state = self.state.lock().await;
        state
            .traders
            .entry(id.clone())
            .or_insert_with(|| TraderProfile::empty(id.clone()))
            .trading_code = Some(code.clone());
        Ok(())
    }
}

#[async_trait]
impl TradeListRepository for InMemoryTradingStore {
    async fn apply_change(
        &self,
        change: &MembershipChange,
    ) -> Result<TraderProfile, TradeListRepositoryError> {
        let mut state = self.state.lock().await;
        let mut trader = state
            .traders
            .get(&change.user_id)
            .cloned()
            .ok_or_else(|| TradeListRepositoryError::trader_not_found(change.user_id.as_str()))?;
        let mut relationship = state
            .relationships
            .get(&change.card_id)
            .cloned()
            .unwrap_or_else(|| CardRelationship::empty(change.card_id.clone()));

        // Work on copies so a rejection leaves both records untouched.
        apply_membership_change(change, &mut trader, &mut relationship)?;

        state
            .relationships
            .insert(change.card_id.clone(), relationship);
        state.traders.insert(change.user_id.clone(), trader.clone());
        Ok(trader)
    }

    async fn find_relationship(
        &self,
        card_id: &CardId,
    ) -> Result<Option<CardRelationship>, TradeListRepositoryError> {
        Ok(self.state.lock().await.relationships.get(card_id).cloned())
    }
}

#[async_trait]
impl TradeProposalRepository for InMemoryTradingStore {
    async fn record(&self, proposal: &TradeProposal) -> Result<(), TradeProposalRepositoryError> {
        let mut state = self.state.lock().await;
        for trader in [proposal.proposer(), proposal.counterparty()] {
            if !state.traders.contains_key(trader) {
                return Err(TradeProposalRepositoryError::trader_not_found(
                    trader.as_str(),
                ));
            }
        }

        state
            .logs
            .entry(proposal.proposer().clone())
            .or_default()
            .push(TradeDirection::Proposed, proposal.proposed_entry());
        state
            .logs
            .entry(proposal.counterparty().clone())
            .or_default()
            .push(TradeDirection::Requested, proposal.request_entry());
        Ok(())
    }

    async fn trade_log(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TradeLog>, TradeProposalRepositoryError> {
        let state = self.state.lock().await;
        if !state.traders.contains_key(user_id) {
            return Ok(None);
        }
        Ok(Some(state.logs.get(user_id).cloned().unwrap_or_default()))
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryTradingStore {
    async fn list_cards(&self) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError> {
        Ok(self.state.lock().await.catalogue.values().cloned().collect())
    }

    async fn find_card(
        &self,
        pack: &PackId,
        number: &CardNumber,
    ) -> Result<CardLookup, CatalogueRepositoryError> {
        let state = self.state.lock().await;
        let id = CardId::from_parts(pack.clone(), number.clone());
        if let Some(card) = state.catalogue.get(&id) {
            return Ok(CardLookup::Found(card.clone()));
        }
        if state.catalogue.values().any(|card| &card.pack == pack) {
            Ok(CardLookup::CardMissing)
        } else {
            Ok(CardLookup::PackMissing)
        }
    }

    async fn find_cards(
        &self,
        ids: &[CardId],
    ) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.catalogue.get(id).cloned())
            .collect())
    }

    async fn upsert_cards(
        &self,
        cards: &[CatalogueCard],
    ) -> Result<usize, CatalogueRepositoryError> {
        let mut state = self.state.lock().await;
        for card in cards {
            state.catalogue.insert(card.id(), card.clone());
        }
        Ok(cards.len())
    }
}
