//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local store used when no database is configured

pub mod memory;
pub mod persistence;
