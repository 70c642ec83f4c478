mod db;
mod keys;

pub use db::SqliteKv;
pub use keys::StorageKey;

use anyhow::{Error, Result};
use async_trait::async_trait;

/// String-keyed persistence used for transcripts, booking flags and
/// the signed in session.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, Error>;
    async fn set(&self, key: &StorageKey, value: &str) -> Result<(), Error>;
    async fn remove(&self, key: &StorageKey) -> Result<(), Error>;
}
