//! Shared helpers for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error mapping from pool and Diesel errors into port error constructors
//! - Row-to-domain conversion for the identifier arrays stored in Postgres
//! - The transaction error wrapper used by multi-record operations

use tracing::debug;

use crate::domain::{
    CardId, CardNumber, CatalogueCard, PackId, TraderProfile, TradingCode, UserId,
};

use super::models::{CatalogueCardRow, TraderRow};
use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map a Diesel error into a repository error.
///
/// Closed connections map through `connection`; everything else maps
/// through `query`. The underlying detail is logged at debug level and kept
/// out of the returned message.
pub fn map_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    operation: &'static str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection(format!("{operation}: database connection error"))
        }
        DieselError::NotFound => query(format!("{operation}: record not found")),
        _ => query(format!("{operation}: database error")),
    }
}

/// A stored value failed domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {column} value {value:?} is invalid")]
pub struct CorruptRow {
    column: &'static str,
    value: String,
}

impl CorruptRow {
    pub fn new(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Parse stored user ids.
pub fn user_ids(column: &'static str, raw: &[String]) -> Result<Vec<UserId>, CorruptRow> {
    raw.iter()
        .map(|value| UserId::new(value.as_str()).map_err(|_| CorruptRow::new(column, value)))
        .collect()
}

/// Parse stored card ids.
pub fn card_ids(column: &'static str, raw: &[String]) -> Result<Vec<CardId>, CorruptRow> {
    raw.iter()
        .map(|value| CardId::parse(value).map_err(|_| CorruptRow::new(column, value)))
        .collect()
}

/// Render ids in their canonical text form for array columns.
pub fn id_strings<T: AsRef<str>>(ids: &[T]) -> Vec<String> {
    ids.iter().map(|id| id.as_ref().to_owned()).collect()
}

/// Convert a trader row into a profile.
pub fn row_to_trader(row: TraderRow) -> Result<TraderProfile, CorruptRow> {
    let id = UserId::new(row.id.as_str()).map_err(|_| CorruptRow::new("traders.id", &row.id))?;
    let trading_code = row
        .trading_code
        .map(|code| {
            TradingCode::new(code.as_str()).map_err(|_| CorruptRow::new("traders.trading_code", code))
        })
        .transpose()?;
    Ok(TraderProfile {
        id,
        trading_code,
        cards_for_trade: card_ids("traders.cards_for_trade", &row.cards_for_trade)?,
        wishlist: card_ids("traders.wishlist", &row.wishlist)?,
    })
}

/// Convert a catalogue row into a card.
pub fn row_to_card(row: CatalogueCardRow) -> Result<CatalogueCard, CorruptRow> {
    let pack = PackId::new(&row.pack_id)
        .map_err(|_| CorruptRow::new("catalogue_cards.pack_id", &row.pack_id))?;
    let number = CardNumber::new(&row.card_number)
        .map_err(|_| CorruptRow::new("catalogue_cards.card_number", &row.card_number))?;
    CatalogueCard::new(
        pack,
        number,
        row.name,
        row.image_url,
        row.pack_name,
        row.rarity,
    )
    .map_err(|err| CorruptRow::new("catalogue_cards", err.to_string()))
}

/// Error type threaded through `conn.transaction`.
///
/// Diesel needs `From<diesel::result::Error>`; `Port` carries a port error
/// raised deliberately inside the transaction so it rolls back.
#[derive(Debug)]
pub enum TxError<E> {
    Diesel(diesel::result::Error),
    Port(E),
}

impl<E> From<diesel::result::Error> for TxError<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}
