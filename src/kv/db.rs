use anyhow::{Error, Result};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::{KvStore, StorageKey};

/// Key-value store backed by the `kv` table.
#[derive(Clone)]
pub struct SqliteKv {
    db: Connection,
}

impl SqliteKv {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, Error> {
        let k = key.to_string();
        let value = self
            .db
            .call(move |conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?", [k], |row| row.get(0))
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &StorageKey, value: &str) -> Result<(), Error> {
        let k = key.to_string();
        let v = value.to_owned();
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [k, v],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &StorageKey) -> Result<(), Error> {
        let k = key.to_string();
        self.db
            .call(move |conn| {
                conn.execute("DELETE FROM kv WHERE key = ?", [k])?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
