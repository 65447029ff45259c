//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the trading ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module; repositories only
//! translate between rows and domain types.
//!
//! # Example
//!
//! ```ignore
//! use tradepost::outbound::persistence::{DbPool, DieselTraderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tradepost")).await?;
//! let traders = DieselTraderRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
pub(crate) mod diesel_helpers;
mod diesel_trade_list_repository;
mod diesel_trade_proposal_repository;
mod diesel_trader_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_trade_list_repository::DieselTradeListRepository;
pub use diesel_trade_proposal_repository::DieselTradeProposalRepository;
pub use diesel_trader_repository::DieselTraderRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
