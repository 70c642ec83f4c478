//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use super::public::{ChatRequest, ChatView};
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::auth::Session;
use crate::triage::ChatState;

type SharedState = Arc<RwLock<AppState>>;

/// Get the user's transcript and booking prompts
async fn chat_view(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Json<ChatView> {
    let store = state
        .read()
        .expect("Unable to read share state")
        .conversation_store();
    let session = Session::new(&user_id);
    let mut chat = ChatState::greeting();
    store.load(&session, &mut chat).await;

    Json(ChatView::new(&chat))
}

/// Send a message and wait for the assistant's reply
async fn chat_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatView>, ApiError> {
    let store = state
        .read()
        .expect("Unable to read share state")
        .conversation_store();
    let session = Session::new(&user_id);
    let mut chat = store.read_state(&session).await?;

    if store.send(&session, &mut chat, &payload.message).await?.is_none() {
        tracing::debug!("Ignoring blank message from {}", user_id);
    }

    Ok(Json(ChatView::new(&chat)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(chat_view).post(chat_handler))
}
