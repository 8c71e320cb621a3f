mod db;
mod errors;

pub mod orders;
pub mod products;
pub mod reports;

use std::{str::FromStr, time::Duration};

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::trace;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite,
    SqlitePool,
    Transaction,
};

/// How long a connection waits for another writer to finish before giving up with `database is locked`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection pool in WAL mode, so that readers never block the single writer, with an explicit
/// [`BUSY_TIMEOUT`].
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Begins a transaction that holds the database write lock from its first statement, like `BEGIN IMMEDIATE`.
///
/// A plain `BEGIN` transaction that reads and then writes cannot wait for a concurrent writer: SQLite refuses the
/// upgrade with `SQLITE_BUSY` straight away. Taking the write lock up front means the busy timeout applies instead,
/// and the reads that follow see the latest committed state.
///
/// The returned transaction rolls back when dropped without a commit.
pub async fn begin_immediate(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, SqliteDatabaseError> {
    let mut tx = pool.begin().await?;
    // Touches no rows, but still takes the write lock.
    sqlx::query("UPDATE orders SET id = id WHERE 0").execute(&mut *tx).await?;
    trace!("🗃️ Write transaction started");
    Ok(tx)
}
