//! PostgreSQL-backed `TraderRepository` implementation using Diesel ORM.
//!
//! Trader rows hold the trading code and both card lists. Deleting a trader
//! cascades to its trade log rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TraderRepository, TraderRepositoryError};
use crate::domain::{TraderProfile, TradingCode, UserId};

use super::diesel_helpers::{
    CorruptRow, id_strings, map_diesel_error as map_diesel, map_pool_error_message, row_to_trader,
};
use super::models::{NewTraderRow, TraderRow};
use super::pool::{DbPool, PoolError};
use super::schema::traders;

/// Diesel-backed implementation of the `TraderRepository` port.
#[derive(Clone)]
pub struct DieselTraderRepository {
    pool: DbPool,
}

impl DieselTraderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TraderRepositoryError {
    TraderRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &'static str) -> TraderRepositoryError {
    map_diesel(
        error,
        operation,
        TraderRepositoryError::query,
        TraderRepositoryError::connection,
    )
}

fn map_corrupt_row(error: CorruptRow) -> TraderRepositoryError {
    TraderRepositoryError::query(error.to_string())
}

#[async_trait]
impl TraderRepository for DieselTraderRepository {
    async fn find(&self, id: &UserId) -> Result<Option<TraderProfile>, TraderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TraderRow> = traders::table
            .find(id.as_str())
            .select(TraderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "load trader"))?;
        row.map(row_to_trader).transpose().map_err(map_corrupt_row)
    }

    async fn find_many(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<TraderProfile>, TraderRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TraderRow> = traders::table
            .filter(traders::id.eq_any(id_strings(ids)))
            .select(TraderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "load traders"))?;
        rows.into_iter()
            .map(row_to_trader)
            .collect::<Result<_, _>>()
            .map_err(map_corrupt_row)
    }

    async fn create_if_absent(&self, id: &UserId) -> Result<bool, TraderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(traders::table)
            .values(&NewTraderRow {
                id: id.as_str(),
                trading_code: None,
            })
            .on_conflict(traders::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "create trader"))?;
        Ok(inserted > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, TraderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(traders::table.find(id.as_str()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete trader"))?;
        Ok(deleted > 0)
    }

    async fn save_trading_code(
        &self,
        id: &UserId,
        code: &TradingCode,
    ) -> Result<(), TraderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(traders::table)
            .values(&NewTraderRow {
                id: id.as_str(),
                trading_code: Some(code.as_str()),
            })
            .on_conflict(traders::id)
            .do_update()
            .set((
                traders::trading_code.eq(excluded(traders::trading_code)),
                traders::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "save trading code"))?;
        Ok(())
    }
}
