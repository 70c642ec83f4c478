use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

use crate::kv::StorageKey;

/// Open (creating if needed) the SQLite database at `db_path`.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    let db = Connection::open(db_path).await?;
    Ok(db)
}

pub fn initialize_db(conn: &SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
             key TEXT PRIMARY KEY,
             value TEXT NOT NULL
         );",
    )
}

/// Brings an existing database up to date. Unscoped booking flags
/// written by older clients are shared across every account on the
/// device so they get dropped here.
pub fn migrate_db(conn: &SyncConnection) -> Result<usize, rusqlite::Error> {
    initialize_db(conn)?;
    let mut removed = 0;
    for key in StorageKey::legacy_keys() {
        removed += conn.execute("DELETE FROM kv WHERE key = ?", [key.to_string()])?;
    }
    Ok(removed)
}
