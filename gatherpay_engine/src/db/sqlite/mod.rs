//! SQLite backend for the funding core.
//!
//! Connection-level queries live in [`events`] and [`contributions`]. They take a `&mut SqliteConnection` so that
//! callers decide whether to run them inside a transaction. [`SqliteDatabase`] wires them up to the backend traits.
//!
//! Queries here use `fetch_all` or `execute`, even for single rows. A statement that is not stepped to completion keeps
//! its read snapshot open in WAL mode, and the pooled connection then misses rows committed after it.
mod db;
mod errors;

pub mod contributions;
pub mod events;

use std::{env, str::FromStr, time::Duration};

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

const SQLITE_DB_URL: &str = "sqlite://data/gatherpay.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub fn db_url() -> String {
    let result = env::var("GP_DATABASE_URL").unwrap_or_else(|_| {
        info!("GP_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Opens a connection pool. Writers wait on each other for up to [`BUSY_TIMEOUT`] rather than failing immediately.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
