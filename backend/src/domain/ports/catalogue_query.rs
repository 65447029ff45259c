//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{CardNumber, CatalogueCard, Error, PackId};

/// Domain use-case port for browsing the card catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every card, sorted by pack release order then card number.
    async fn list_cards(&self) -> Result<Vec<CatalogueCard>, Error>;

    /// One card. Not found errors say whether the pack or the card is
    /// missing.
    async fn card(&self, pack: &PackId, number: &CardNumber) -> Result<CatalogueCard, Error>;
}
