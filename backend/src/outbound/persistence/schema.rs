//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Trader records, the owning side of the trade lists.
    traders (id) {
        /// Identity-provider user id.
        id -> Text,
        /// `XXXX-XXXX-XXXX-XXXX`, absent until saved.
        trading_code -> Nullable<Text>,
        /// Canonical card ids offered for trade, insertion ordered.
        cards_for_trade -> Array<Text>,
        /// Canonical card ids wanted, insertion ordered.
        wishlist -> Array<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-card reverse index of the trader lists.
    card_relationships (card_id) {
        /// Canonical card id.
        card_id -> Text,
        /// Trader ids offering the card.
        have -> Array<Text>,
        /// Trader ids wanting the card.
        want -> Array<Text>,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only trade log. Each proposal writes two rows, one per trader.
    trade_proposals (id) {
        /// Row identifier.
        id -> Uuid,
        /// Insertion sequence used for ordering.
        seq -> Int8,
        /// Trader whose log holds this row.
        owner_id -> Text,
        /// `proposed` or `requested`.
        direction -> Text,
        /// The other trader.
        friend_id -> Text,
        /// Card the owner gives.
        card_to_trade -> Text,
        /// Card the owner receives.
        card_to_receive -> Text,
        /// Proposer's message.
        message -> Text,
        /// Proposal creation time, shared by both rows.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Card catalogue, keyed by pack and number.
    catalogue_cards (pack_id, card_number) {
        /// Pack slug.
        pack_id -> Text,
        /// Number within the pack.
        card_number -> Text,
        /// Display name.
        name -> Text,
        /// Artwork location.
        image_url -> Text,
        /// Pack display name.
        pack_name -> Text,
        /// Rarity marker.
        rarity -> Text,
    }
}

diesel::joinable!(trade_proposals -> traders (owner_id));

diesel::allow_tables_to_appear_in_same_query!(
    traders,
    card_relationships,
    trade_proposals,
    catalogue_cards,
);
