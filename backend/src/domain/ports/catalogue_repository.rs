//! Port for the card catalogue.
//!
//! The catalogue is reference data keyed by pack. Users never mutate it; the
//! only writer is the start-up import.

use async_trait::async_trait;

use crate::domain::{CardId, CardNumber, CatalogueCard, PackId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "catalogue repository query failed: {message}",
    }
}

/// Outcome of a single-card lookup.
///
/// Distinguishes an unknown pack from an unknown card so clients get the
/// precise not-found message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLookup {
    /// The card exists.
    Found(CatalogueCard),
    /// No card in the catalogue belongs to the pack.
    PackMissing,
    /// The pack exists but has no card with this number.
    CardMissing,
}

/// Catalogue storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Every card, in no particular order.
    async fn list_cards(&self) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError>;

    /// Look up one card by pack and number.
    async fn find_card(
        &self,
        pack: &PackId,
        number: &CardNumber,
    ) -> Result<CardLookup, CatalogueRepositoryError>;

    /// Fetch every card in `ids` that exists. Order is unspecified.
    async fn find_cards(
        &self,
        ids: &[CardId],
    ) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError>;

    /// Insert or replace cards, returning how many were written.
    async fn upsert_cards(
        &self,
        cards: &[CatalogueCard],
    ) -> Result<usize, CatalogueRepositoryError>;
}
