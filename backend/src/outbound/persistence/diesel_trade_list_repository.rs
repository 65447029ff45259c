//! PostgreSQL-backed `TradeListRepository` implementation using Diesel ORM.
//!
//! A membership change runs in one transaction that row-locks the trader,
//! then the card relationship (`SELECT ... FOR UPDATE`), applies the domain
//! list arithmetic to both, and writes both back. The lock order is always
//! trader first, so concurrent changes serialise without deadlocking.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    MembershipChange, TradeListRepository, TradeListRepositoryError, apply_membership_change,
};
use crate::domain::{CardId, CardRelationship, TraderProfile};

use super::diesel_helpers::{
    CorruptRow, TxError, id_strings, map_diesel_error as map_diesel,
    map_pool_error_message, row_to_trader, user_ids,
};
use super::models::{CardRelationshipRow, CardRelationshipWrite, TraderListsUpdate, TraderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{card_relationships, traders};

/// Diesel-backed implementation of the `TradeListRepository` port.
#[derive(Clone)]
pub struct DieselTradeListRepository {
    pool: DbPool,
}

impl DieselTradeListRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TradeListRepositoryError {
    TradeListRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
) -> TradeListRepositoryError {
    map_diesel(
        error,
        operation,
        TradeListRepositoryError::query,
        TradeListRepositoryError::connection,
    )
}

fn map_corrupt_row(error: CorruptRow) -> TradeListRepositoryError {
    TradeListRepositoryError::query(error.to_string())
}

fn map_tx_error(error: TxError<TradeListRepositoryError>) -> TradeListRepositoryError {
    match error {
        TxError::Diesel(err) => map_diesel_error(err, "apply membership change"),
        TxError::Port(err) => err,
    }
}

fn row_to_relationship(row: CardRelationshipRow) -> Result<CardRelationship, CorruptRow> {
    let card_id = CardId::parse(&row.card_id)
        .map_err(|_| CorruptRow::new("card_relationships.card_id", &row.card_id))?;
    Ok(CardRelationship {
        card_id,
        have: user_ids("card_relationships.have", &row.have)?,
        want: user_ids("card_relationships.want", &row.want)?,
    })
}

#[async_trait]
impl TradeListRepository for DieselTradeListRepository {
    async fn apply_change(
        &self,
        change: &MembershipChange,
    ) -> Result<TraderProfile, TradeListRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError<TradeListRepositoryError>, _>(|conn| {
            async move {
                let trader_row: Option<TraderRow> = traders::table
                    .find(change.user_id.as_str())
                    .select(TraderRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let mut trader = trader_row
                    .ok_or_else(|| {
                        TxError::Port(TradeListRepositoryError::trader_not_found(
                            change.user_id.as_str(),
                        ))
                    })
                    .and_then(|row| {
                        row_to_trader(row).map_err(|err| TxError::Port(map_corrupt_row(err)))
                    })?;

                // The row must exist before it can be locked.
                diesel::insert_into(card_relationships::table)
                    .values(card_relationships::card_id.eq(change.card_id.as_str()))
                    .on_conflict(card_relationships::card_id)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                let relationship_row: CardRelationshipRow = card_relationships::table
                    .find(change.card_id.as_str())
                    .select(CardRelationshipRow::as_select())
                    .for_update()
                    .first(conn)
                    .await?;
                let mut relationship = row_to_relationship(relationship_row)
                    .map_err(|err| TxError::Port(map_corrupt_row(err)))?;

                apply_membership_change(change, &mut trader, &mut relationship)
                    .map_err(TxError::Port)?;

                let cards_for_trade = id_strings(&trader.cards_for_trade);
                let wishlist = id_strings(&trader.wishlist);
                diesel::update(traders::table.find(change.user_id.as_str()))
                    .set(&TraderListsUpdate {
                        cards_for_trade: &cards_for_trade,
                        wishlist: &wishlist,
                        updated_at: chrono::Utc::now(),
                    })
                    .execute(conn)
                    .await?;

                let have = id_strings(&relationship.have);
                let want = id_strings(&relationship.want);
                diesel::update(card_relationships::table.find(change.card_id.as_str()))
                    .set(&CardRelationshipWrite {
                        card_id: change.card_id.as_str(),
                        have: &have,
                        want: &want,
                        updated_at: chrono::Utc::now(),
                    })
                    .execute(conn)
                    .await?;

                Ok(trader)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn find_relationship(
        &self,
        card_id: &CardId,
    ) -> Result<Option<CardRelationship>, TradeListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CardRelationshipRow> = card_relationships::table
            .find(card_id.as_str())
            .select(CardRelationshipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "load card relationship"))?;
        row.map(row_to_relationship)
            .transpose()
            .map_err(map_corrupt_row)
    }
}
