//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use tempfile::TempDir;

use medgod::api::AppState;
use medgod::api::app;
use medgod::core::db::{async_db, initialize_db};
use medgod::core::{AppConfig, DEFAULT_SYSTEM_MESSAGE};
use medgod::kv::SqliteKv;
use medgod::triage::ConversationStore;

/// Config pointing at a temporary storage dir and the given mock
/// servers for completions and accounts.
pub fn test_config(dir: &TempDir, llm_host: &str, identity_host: &str) -> AppConfig {
    let storage_path = dir.path().display().to_string();
    AppConfig {
        db_path: format!("{}/medgod.db", storage_path),
        storage_path,
        openai_model: String::from("mistralai/mistral-7b-instruct"),
        openai_api_hostname: llm_host.to_string(),
        openai_api_key: String::from("test-api-key"),
        app_referer: String::from("https://hospital-ai-app.dev"),
        app_title: String::from("Hospital-AI-App"),
        system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
        identity_api_hostname: identity_host.to_string(),
        identity_api_key: String::from("test-identity-key"),
    }
}

pub async fn test_kv(config: &AppConfig) -> SqliteKv {
    let db = async_db(&config.db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await
    .expect("Failed to initialize db");
    SqliteKv::new(db)
}

/// A conversation store on a fresh database. The returned kv shares
/// the same connection so tests can inspect what was persisted. Keep
/// the `TempDir` alive for the duration of the test.
pub async fn test_store(llm_host: &str) -> (ConversationStore<SqliteKv>, SqliteKv, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&dir, llm_host, "http://127.0.0.1:9");
    let kv = test_kv(&config).await;
    let store = ConversationStore::from_config(kv.clone(), &config);
    (store, kv, dir)
}

/// Creates a test application router backed by a temporary database.
pub async fn test_app(llm_host: &str, identity_host: &str) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&dir, llm_host, identity_host);
    let db = async_db(&config.db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await
    .expect("Failed to initialize db");

    let app_state = AppState::new(db, config);
    (app(Arc::new(RwLock::new(app_state))), dir)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

/// An OpenAI style chat completion response body.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "gen-123",
        "model": "mistralai/mistral-7b-instruct",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub const TRIAGE_REPLY: &str = "  **Diagnosis:** Likely influenza.

**Recommended Tests:**
- Complete Blood Count (CBC)
- Influenza A/B swab

**Suggested Medicines:**
- Paracetamol 500mg
- Oseltamivir
";
