//! Shared helper utilities for tradepost integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers live here instead of being copied between suites.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{format_postgres_error, migrate_schema, reset_database};
