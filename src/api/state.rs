use tokio_rusqlite::Connection;

use crate::auth::IdentityClient;
use crate::core::AppConfig;
use crate::kv::SqliteKv;
use crate::triage::ConversationStore;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self { db, config }
    }

    pub fn conversation_store(&self) -> ConversationStore<SqliteKv> {
        ConversationStore::from_config(SqliteKv::new(self.db.clone()), &self.config)
    }

    pub fn identity_client(&self) -> IdentityClient {
        IdentityClient::from_config(&self.config)
    }
}
