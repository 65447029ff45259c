//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{card_relationships, catalogue_cards, trade_proposals, traders};

/// Row struct for reading from the traders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = traders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TraderRow {
    pub id: String,
    pub trading_code: Option<String>,
    pub cards_for_trade: Vec<String>,
    pub wishlist: Vec<String>,
}

/// Insertable struct for creating trader records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = traders)]
pub(crate) struct NewTraderRow<'a> {
    pub id: &'a str,
    pub trading_code: Option<&'a str>,
}

/// Changeset writing both trader lists back after a membership change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = traders)]
pub(crate) struct TraderListsUpdate<'a> {
    pub cards_for_trade: &'a [String],
    pub wishlist: &'a [String],
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Card relationship models
// ---------------------------------------------------------------------------

/// Row struct for reading from the card_relationships table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = card_relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CardRelationshipRow {
    pub card_id: String,
    pub have: Vec<String>,
    pub want: Vec<String>,
}

/// Insertable or upsert payload for a card relationship.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = card_relationships)]
pub(crate) struct CardRelationshipWrite<'a> {
    pub card_id: &'a str,
    pub have: &'a [String],
    pub want: &'a [String],
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trade proposal models
// ---------------------------------------------------------------------------

/// Row struct for reading from the trade_proposals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trade_proposals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeProposalRow {
    pub direction: String,
    pub friend_id: String,
    pub card_to_trade: String,
    pub card_to_receive: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for one side of a trade proposal.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trade_proposals)]
pub(crate) struct NewTradeProposalRow<'a> {
    pub id: Uuid,
    pub owner_id: &'a str,
    pub direction: &'static str,
    pub friend_id: &'a str,
    pub card_to_trade: &'a str,
    pub card_to_receive: &'a str,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Catalogue models
// ---------------------------------------------------------------------------

/// Row struct for reading from the catalogue_cards table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = catalogue_cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CatalogueCardRow {
    pub pack_id: String,
    pub card_number: String,
    pub name: String,
    pub image_url: String,
    pub pack_name: String,
    pub rarity: String,
}

/// Insertable struct for catalogue upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalogue_cards)]
pub(crate) struct NewCatalogueCardRow<'a> {
    pub pack_id: &'a str,
    pub card_number: &'a str,
    pub name: &'a str,
    pub image_url: &'a str,
    pub pack_name: &'a str,
    pub rarity: &'a str,
}
