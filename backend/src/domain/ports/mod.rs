//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`) describe how the domain reaches storage.
//! Each exposes a typed error so adapters map their failures into
//! predictable variants. Driving ports (`*Command`, `*Query`) are what
//! inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod catalogue_repository;
mod identity_sync_command;
mod trade_list_command;
mod trade_list_query;
mod trade_list_repository;
mod trade_proposal_command;
mod trade_proposal_query;
mod trade_proposal_repository;
mod trader_repository;
mod trading_code_command;

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CardLookup, CatalogueRepository, CatalogueRepositoryError};
pub use identity_sync_command::IdentitySyncCommand;
#[cfg(test)]
pub use identity_sync_command::MockIdentitySyncCommand;
#[cfg(test)]
pub use trade_list_command::MockTradeListCommand;
pub use trade_list_command::TradeListCommand;
#[cfg(test)]
pub use trade_list_query::MockTradeListQuery;
pub use trade_list_query::{CardTradeStatus, CardTraders, TradeListQuery, TraderSummary};
#[cfg(test)]
pub use trade_list_repository::MockTradeListRepository;
pub use trade_list_repository::{
    MembershipChange, TradeListRepository, TradeListRepositoryError, apply_membership_change,
};
#[cfg(test)]
pub use trade_proposal_command::MockTradeProposalCommand;
pub use trade_proposal_command::{ProposeTradeRequest, TradeProposalCommand};
#[cfg(test)]
pub use trade_proposal_query::MockTradeProposalQuery;
pub use trade_proposal_query::{ResolvedTradeEntry, ResolvedTradeLog, TradeProposalQuery};
#[cfg(test)]
pub use trade_proposal_repository::MockTradeProposalRepository;
pub use trade_proposal_repository::{TradeProposalRepository, TradeProposalRepositoryError};
#[cfg(test)]
pub use trader_repository::MockTraderRepository;
pub use trader_repository::{TraderRepository, TraderRepositoryError};
#[cfg(test)]
pub use trading_code_command::MockTradingCodeCommand;
pub use trading_code_command::TradingCodeCommand;
