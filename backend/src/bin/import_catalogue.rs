//! Import the card catalogue JSON into PostgreSQL without starting the server.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Builder;
use tradepost::catalogue_import::import_catalogue_file;
use tradepost::outbound::persistence::{
    DbPool, DieselCatalogueRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "TRADEPOST_DATABASE_URL";

/// `import-catalogue` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-catalogue",
    about = "Upsert the card catalogue JSON into the tradepost database",
    version
)]
struct CliArgs {
    /// Path to the pack-keyed catalogue JSON.
    #[arg(long = "catalogue", value_name = "path")]
    catalogue_path: PathBuf,
    /// Database connection URL. Falls back to `TRADEPOST_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before importing.
    #[arg(long = "migrate")]
    migrate: bool,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;

    if args.migrate {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|error| io::Error::other(format!("migration task: {error}")))?
            .map_err(|error| io::Error::other(error.to_string()))?;
        println!("migrations_applied={applied}");
    }

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let repository = DieselCatalogueRepository::new(pool);
    let written = import_catalogue_file(&args.catalogue_path, &repository)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;

    println!("catalogue={}", args.catalogue_path.display());
    println!("cards_written={written}");
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (value, source) = match (explicit, from_env) {
        (Some(value), _) => (value, "--database-url"),
        (None, Some(value)) => (value, DATABASE_URL_ENV),
        (None, None) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database URL missing: set --database-url or {DATABASE_URL_ENV}"),
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn explicit_url_wins_over_environment() {
        let url = resolve_database_url(
            Some("postgres://cli/tradepost".to_owned()),
            Some("postgres://env/tradepost".to_owned()),
        )
        .expect("url");
        assert_eq!(url, "postgres://cli/tradepost");
    }

    #[rstest]
    fn environment_url_is_the_fallback() {
        let url = resolve_database_url(None, Some("postgres://env/tradepost".to_owned()))
            .expect("url");
        assert_eq!(url, "postgres://env/tradepost");
    }

    #[rstest]
    #[case(None, None, "database URL missing")]
    #[case(Some("  ".to_owned()), None, "--database-url must not be empty")]
    #[case(None, Some(String::new()), "TRADEPOST_DATABASE_URL must not be empty")]
    fn missing_or_blank_urls_are_rejected(
        #[case] explicit: Option<String>,
        #[case] from_env: Option<String>,
        #[case] message: &str,
    ) {
        let error = resolve_database_url(explicit, from_env).expect_err("invalid url");
        assert!(error.to_string().contains(message));
    }

    #[rstest]
    fn cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "import-catalogue",
            "--catalogue",
            "cards.json",
            "--migrate",
        ])
        .expect("valid args");
        assert_eq!(args.catalogue_path, PathBuf::from("cards.json"));
        assert!(args.migrate);
        assert!(args.database_url.is_none());
    }
}
