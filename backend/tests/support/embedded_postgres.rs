//! Database preparation for embedded PostgreSQL suites.
//!
//! Database reset uses `postgres` directly because `DROP DATABASE` cannot
//! run inside the transaction Diesel would open. Schema setup runs the same
//! embedded migrations the server applies at start-up.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tradepost::outbound::persistence::run_pending_migrations;

/// Render a `postgres` error with its SQLSTATE, detail and hint.
///
/// `postgres::Error`'s `Display` often collapses to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Drop and recreate `name` on the cluster.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Run every embedded migration against `url`.
pub fn migrate_schema(url: &str) -> Result<usize, String> {
    run_pending_migrations(url).map_err(|err| err.to_string())
}
