//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Keep types immutable where possible and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - CatalogueCard, CardId — catalogue entries and their identifiers.
//! - TraderProfile, CardRelationship — the two sides of the trade lists.
//! - TradeProposal, TradeLog — mirrored trade proposals.
//! - Services — `CatalogueService`, `TradeListService`,
//!   `TradingCodeService`, `TradeProposalService`, `IdentitySyncService`.

pub mod card;
pub mod card_relationship;
mod catalogue_service;
pub mod error;
pub mod identity_event;
mod identity_sync_service;
pub mod membership;
pub mod ports;
pub mod trace_id;
pub mod trade;
mod trade_list_service;
mod trade_proposal_service;
pub mod trader;
mod trading_code_service;

pub use self::card::{
    CardId, CardNumber, CardValidationError, CatalogueCard, PackId, pack_rank, sort_catalogue,
};
pub use self::card_relationship::CardRelationship;
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity_event::{IdentityEvent, IdentitySyncOutcome};
pub use self::identity_sync_service::IdentitySyncService;
pub use self::membership::{ListAction, TradeList, apply_list_action};
pub use self::trace_id::TraceId;
pub use self::trade::{
    TRADE_MESSAGE_MAX, TradeDirection, TradeEntry, TradeLog, TradeMessage, TradeProposal,
    TradeProposalValidationError,
};
pub use self::trade_list_service::TradeListService;
pub use self::trade_proposal_service::TradeProposalService;
pub use self::trader::{
    MembershipRejection, TraderProfile, TraderValidationError, TradingCode, USER_ID_MAX, UserId,
};
pub use self::trading_code_service::TradingCodeService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tradepost::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Card not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
