//! PostgreSQL-backed `TradeProposalRepository` implementation using Diesel ORM.
//!
//! Each proposal is stored as two rows, the proposer's `proposed` entry and
//! the counterparty's `requested` mirror, inserted in one transaction after
//! both traders are confirmed to exist.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TradeProposalRepository, TradeProposalRepositoryError};
use crate::domain::{
    CardId, TradeDirection, TradeEntry, TradeLog, TradeMessage, TradeProposal, UserId,
};

use super::diesel_helpers::{
    CorruptRow, TxError, map_diesel_error as map_diesel, map_pool_error_message,
};
use super::models::{NewTradeProposalRow, TradeProposalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{trade_proposals, traders};

/// Diesel-backed implementation of the `TradeProposalRepository` port.
#[derive(Clone)]
pub struct DieselTradeProposalRepository {
    pool: DbPool,
}

impl DieselTradeProposalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TradeProposalRepositoryError {
    TradeProposalRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &'static str,
) -> TradeProposalRepositoryError {
    map_diesel(
        error,
        operation,
        TradeProposalRepositoryError::query,
        TradeProposalRepositoryError::connection,
    )
}

fn map_tx_error(error: TxError<TradeProposalRepositoryError>) -> TradeProposalRepositoryError {
    match error {
        TxError::Diesel(err) => map_diesel_error(err, "record trade proposal"),
        TxError::Port(err) => err,
    }
}

fn entry_row<'a>(
    owner: &'a UserId,
    direction: TradeDirection,
    entry: &'a TradeEntry,
) -> NewTradeProposalRow<'a> {
    NewTradeProposalRow {
        id: Uuid::new_v4(),
        owner_id: owner.as_str(),
        direction: direction.as_str(),
        friend_id: entry.friend_id.as_str(),
        card_to_trade: entry.card_to_trade.as_str(),
        card_to_receive: entry.card_to_receive.as_str(),
        message: entry.message.as_str(),
        created_at: entry.timestamp,
    }
}

fn row_to_entry(row: TradeProposalRow) -> Result<(TradeDirection, TradeEntry), CorruptRow> {
    let direction = TradeDirection::from_label(&row.direction)
        .ok_or_else(|| CorruptRow::new("trade_proposals.direction", &row.direction))?;
    let entry = TradeEntry {
        friend_id: UserId::new(row.friend_id.as_str())
            .map_err(|_| CorruptRow::new("trade_proposals.friend_id", &row.friend_id))?,
        card_to_trade: CardId::parse(&row.card_to_trade)
            .map_err(|_| CorruptRow::new("trade_proposals.card_to_trade", &row.card_to_trade))?,
        card_to_receive: CardId::parse(&row.card_to_receive).map_err(|_| {
            CorruptRow::new("trade_proposals.card_to_receive", &row.card_to_receive)
        })?,
        message: TradeMessage::new(&row.message)
            .map_err(|_| CorruptRow::new("trade_proposals.message", &row.message))?,
        timestamp: row.created_at,
    };
    Ok((direction, entry))
}

#[async_trait]
impl TradeProposalRepository for DieselTradeProposalRepository {
    async fn record(&self, proposal: &TradeProposal) -> Result<(), TradeProposalRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let proposed = proposal.proposed_entry();
        let requested = proposal.request_entry();
        let rows = [
            entry_row(proposal.proposer(), TradeDirection::Proposed, &proposed),
            entry_row(proposal.counterparty(), TradeDirection::Requested, &requested),
        ];

        let parties = vec![proposal.proposer().as_str(), proposal.counterparty().as_str()];

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError<TradeProposalRepositoryError>, _>(|conn| {
            async move {
                // Share-lock both traders so neither can be deleted mid-insert.
                let present: Vec<String> = traders::table
                    .filter(traders::id.eq_any(parties))
                    .select(traders::id)
                    .for_share()
                    .load(conn)
                    .await?;
                for trader in [proposal.proposer(), proposal.counterparty()] {
                    if !present.iter().any(|id| id == trader.as_str()) {
                        return Err(TxError::Port(
                            TradeProposalRepositoryError::trader_not_found(trader.as_str()),
                        ));
                    }
                }

                diesel::insert_into(trade_proposals::table)
                    .values(&rows[..])
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }

    async fn trade_log(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TradeLog>, TradeProposalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let exists: Option<String> = traders::table
            .find(user_id.as_str())
            .select(traders::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "load trader"))?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows: Vec<TradeProposalRow> = trade_proposals::table
            .filter(trade_proposals::owner_id.eq(user_id.as_str()))
            .order(trade_proposals::seq.asc())
            .select(TradeProposalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "load trade log"))?;

        let mut log = TradeLog::default();
        for row in rows {
            let (direction, entry) = row_to_entry(row)
                .map_err(|err| TradeProposalRepositoryError::query(err.to_string()))?;
            log.push(direction, entry);
        }
        Ok(Some(log))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; persistence runs against embedded Postgres.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(direction: &str) -> TradeProposalRow {
        TradeProposalRow {
            direction: direction.to_owned(),
            friend_id: "user_b".to_owned(),
            card_to_trade: "genetic-apex-a1-1".to_owned(),
            card_to_receive: "genetic-apex-a1-2".to_owned(),
            message: "hi".to_owned(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("time"),
        }
    }

    #[rstest]
    #[case("proposed", TradeDirection::Proposed)]
    #[case("requested", TradeDirection::Requested)]
    fn rows_convert_to_entries(#[case] label: &str, #[case] expected: TradeDirection) {
        let (direction, entry) = row_to_entry(row(label)).expect("valid row");
        assert_eq!(direction, expected);
        assert_eq!(entry.friend_id.as_str(), "user_b");
    }

    #[rstest]
    fn unknown_direction_is_corrupt() {
        assert!(row_to_entry(row("sideways")).is_err());
    }

    #[rstest]
    fn missing_trader_survives_transaction_mapping() {
        let err = map_tx_error(TxError::Port(TradeProposalRepositoryError::trader_not_found(
            "user_b",
        )));
        assert_eq!(err, TradeProposalRepositoryError::trader_not_found("user_b"));
    }
}
