//! Trade proposal service.
//!
//! Proposals are stamped once from the injected clock so the proposer's and
//! the counterparty's entries carry the same timestamp. Reads resolve card
//! ids against the catalogue in one batch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::catalogue_service::map_catalogue_error;
use crate::domain::ports::{
    CatalogueRepository, ProposeTradeRequest, ResolvedTradeEntry, ResolvedTradeLog,
    TradeProposalCommand, TradeProposalQuery, TradeProposalRepository,
    TradeProposalRepositoryError,
};
use crate::domain::{
    CardId, CatalogueCard, Error, TradeEntry, TradeLog, TradeProposal,
    TradeProposalValidationError, UserId,
};

fn map_proposal_error(error: TradeProposalRepositoryError) -> Error {
    match error {
        TradeProposalRepositoryError::TraderNotFound { user_id } => {
            debug!(%user_id, "trade proposal references unknown trader");
            Error::not_found("User not found")
        }
        other => {
            error!(error = %other, "trade proposal repository failure");
            Error::internal(format!("trade proposal repository error: {other}"))
        }
    }
}

fn map_validation_error(error: &TradeProposalValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Trade proposal service implementing [`TradeProposalCommand`] and
/// [`TradeProposalQuery`].
#[derive(Clone)]
pub struct TradeProposalService<P, C> {
    proposals: Arc<P>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<P, C> TradeProposalService<P, C> {
    /// Create a new service with the given repositories and clock.
    pub fn new(proposals: Arc<P>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            proposals,
            catalogue,
            clock,
        }
    }
}

impl<P, C> TradeProposalService<P, C>
where
    C: CatalogueRepository,
{
    async fn ensure_catalogued(&self, ids: [&CardId; 2]) -> Result<(), Error> {
        let wanted: Vec<CardId> = ids.iter().map(|id| (*id).clone()).collect();
        let found = self
            .catalogue
            .find_cards(&wanted)
            .await
            .map_err(map_catalogue_error)?;
        match ids.into_iter().find(|id| !found.iter().any(|card| card.id() == **id)) {
            Some(missing) => {
                debug!(card_id = %missing, "trade proposal references an unknown card");
                Err(Error::not_found("Card not found"))
            }
            None => Ok(()),
        }
    }

    async fn card_index(&self, log: &TradeLog) -> Result<HashMap<CardId, CatalogueCard>, Error> {
        let mut ids: Vec<CardId> = Vec::new();
        for entry in log.proposed.iter().chain(&log.requests) {
            for id in [&entry.card_to_trade, &entry.card_to_receive] {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let cards = self
            .catalogue
            .find_cards(&ids)
            .await
            .map_err(map_catalogue_error)?;
        Ok(cards.into_iter().map(|card| (card.id(), card)).collect())
    }
}

fn lookup(index: &HashMap<CardId, CatalogueCard>, id: &CardId) -> Result<CatalogueCard, Error> {
    index.get(id).cloned().ok_or_else(|| {
        error!(card_id = %id, "trade log references a card missing from the catalogue");
        Error::internal(format!("card {id} missing from catalogue"))
    })
}

fn resolve_entries(
    entries: Vec<TradeEntry>,
    index: &HashMap<CardId, CatalogueCard>,
) -> Result<Vec<ResolvedTradeEntry>, Error> {
    entries
        .into_iter()
        .map(|entry| {
            Ok(ResolvedTradeEntry {
                card_to_trade: lookup(index, &entry.card_to_trade)?,
                card_to_receive: lookup(index, &entry.card_to_receive)?,
                friend_id: entry.friend_id,
                message: entry.message,
                timestamp: entry.timestamp,
            })
        })
        .collect()
}

#[async_trait]
impl<P, C> TradeProposalCommand for TradeProposalService<P, C>
where
    P: TradeProposalRepository,
    C: CatalogueRepository,
{
    async fn propose(&self, request: ProposeTradeRequest) -> Result<TradeEntry, Error> {
        let ProposeTradeRequest {
            proposer,
            counterparty,
            card_to_trade,
            card_to_receive,
            message,
        } = request;
        let proposal = TradeProposal::new(
            proposer,
            counterparty,
            card_to_trade.clone(),
            card_to_receive.clone(),
            message,
            self.clock.utc(),
        )
        .map_err(|err| map_validation_error(&err))?;
        // Unresolvable ids would poison both parties' trade logs.
        self.ensure_catalogued([&card_to_trade, &card_to_receive]).await?;

        self.proposals
            .record(&proposal)
            .await
            .map_err(map_proposal_error)?;
        info!(
            proposer = %proposal.proposer(),
            counterparty = %proposal.counterparty(),
            "trade proposed"
        );
        Ok(proposal.proposed_entry())
    }
}

#[async_trait]
impl<P, C> TradeProposalQuery for TradeProposalService<P, C>
where
    P: TradeProposalRepository,
    C: CatalogueRepository,
{
    async fn trades(&self, user_id: &UserId) -> Result<ResolvedTradeLog, Error> {
        let log = self
            .proposals
            .trade_log(user_id)
            .await
            .map_err(map_proposal_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let index = self.card_index(&log).await?;
        Ok(ResolvedTradeLog {
            proposed: resolve_entries(log.proposed, &index)?,
            requests: resolve_entries(log.requests, &index)?,
        })
    }
}
