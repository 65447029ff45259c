//! PostgreSQL-backed catalogue adapter.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CardLookup, CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{CardId, CardNumber, CatalogueCard, PackId};

use super::diesel_helpers::{
    CorruptRow, map_diesel_error as map_diesel, map_pool_error_message, row_to_card,
};
use super::models::{CatalogueCardRow, NewCatalogueCardRow};
use super::pool::{DbPool, PoolError};
use super::schema::catalogue_cards;

/// Diesel-backed implementation of the catalogue port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let config = PoolConfig::new("postgres://localhost/tradepost");
    /// let pool = DbPool::new(config).await?;
    /// let repo = DieselCatalogueRepository::new(pool);
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
) -> CatalogueRepositoryError {
    map_diesel(
        error,
        operation,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn collect_cards(rows: Vec<CatalogueCardRow>) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError> {
    rows.into_iter()
        .map(row_to_card)
        .collect::<Result<_, CorruptRow>>()
        .map_err(|err| CatalogueRepositoryError::query(err.to_string()))
}

impl<'a> From<&'a CatalogueCard> for NewCatalogueCardRow<'a> {
    fn from(card: &'a CatalogueCard) -> Self {
        Self {
            pack_id: card.pack.as_str(),
            card_number: card.number.as_str(),
            name: card.name.as_str(),
            image_url: card.image_url.as_str(),
            pack_name: card.pack_name.as_str(),
            rarity: card.rarity.as_str(),
        }
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_cards(&self) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CatalogueCardRow> = catalogue_cards::table
            .select(CatalogueCardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list catalogue"))?;
        collect_cards(rows)
    }

    async fn find_card(
        &self,
        pack: &PackId,
        number: &CardNumber,
    ) -> Result<CardLookup, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CatalogueCardRow> = catalogue_cards::table
            .find((pack.as_str(), number.as_str()))
            .select(CatalogueCardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find card"))?;
        if let Some(row) = row {
            let card = row_to_card(row)
                .map_err(|err| CatalogueRepositoryError::query(err.to_string()))?;
            return Ok(CardLookup::Found(card));
        }

        let pack_exists: bool = diesel::select(diesel::dsl::exists(
            catalogue_cards::table.filter(catalogue_cards::pack_id.eq(pack.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "find pack"))?;
        Ok(if pack_exists {
            CardLookup::CardMissing
        } else {
            CardLookup::PackMissing
        })
    }

    async fn find_cards(
        &self,
        ids: &[CardId],
    ) -> Result<Vec<CatalogueCard>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let packs: HashSet<&str> = ids.iter().map(|id| id.pack().as_str()).collect();
        let numbers: HashSet<&str> = ids.iter().map(|id| id.number().as_str()).collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Narrow by both columns, then drop cross-product matches.
        let rows: Vec<CatalogueCardRow> = catalogue_cards::table
            .filter(catalogue_cards::pack_id.eq_any(packs.into_iter().collect::<Vec<_>>()))
            .filter(catalogue_cards::card_number.eq_any(numbers.into_iter().collect::<Vec<_>>()))
            .select(CatalogueCardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find cards"))?;

        let wanted: HashSet<&CardId> = ids.iter().collect();
        Ok(collect_cards(rows)?
            .into_iter()
            .filter(|card| wanted.contains(&card.id()))
            .collect())
    }

    async fn upsert_cards(
        &self,
        cards: &[CatalogueCard],
    ) -> Result<usize, CatalogueRepositoryError> {
        if cards.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewCatalogueCardRow<'_>> =
            cards.iter().map(NewCatalogueCardRow::from).collect();
        diesel::insert_into(catalogue_cards::table)
            .values(&rows)
            .on_conflict((catalogue_cards::pack_id, catalogue_cards::card_number))
            .do_update()
            .set((
                catalogue_cards::name.eq(excluded(catalogue_cards::name)),
                catalogue_cards::image_url.eq(excluded(catalogue_cards::image_url)),
                catalogue_cards::pack_name.eq(excluded(catalogue_cards::pack_name)),
                catalogue_cards::rarity.eq(excluded(catalogue_cards::rarity)),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "upsert catalogue"))
    }
}
