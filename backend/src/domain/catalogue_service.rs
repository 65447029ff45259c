//! Catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{
    CardLookup, CatalogueQuery, CatalogueRepository, CatalogueRepositoryError,
};
use crate::domain::{CardNumber, CatalogueCard, Error, PackId, sort_catalogue};

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    error!(%error, "catalogue repository failure");
    Error::internal(format!("catalogue repository error: {error}"))
}

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    /// Create a new service over the given repository.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn list_cards(&self) -> Result<Vec<CatalogueCard>, Error> {
        let mut cards = self
            .catalogue
            .list_cards()
            .await
            .map_err(map_catalogue_error)?;
        sort_catalogue(&mut cards);
        Ok(cards)
    }

    async fn card(&self, pack: &PackId, number: &CardNumber) -> Result<CatalogueCard, Error> {
        match self
            .catalogue
            .find_card(pack, number)
            .await
            .map_err(map_catalogue_error)?
        {
            CardLookup::Found(card) => Ok(card),
            CardLookup::PackMissing => Err(Error::not_found("Pack not found")),
            CardLookup::CardMissing => Err(Error::not_found("Card not found")),
        }
    }
}
