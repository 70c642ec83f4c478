//! Router for booking recommended tests and medicines

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use super::public::{BookingRequest, BookingResponse};
use crate::api::public::ApiError;
use crate::api::routes::chat::public::ChatView;
use crate::api::state::AppState;
use crate::auth::Session;
use crate::triage::Category;

type SharedState = Arc<RwLock<AppState>>;

/// Clear both booking flags so the prompts show again
async fn reset_handler(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<ChatView>, ApiError> {
    let store = state
        .read()
        .expect("Unable to read share state")
        .conversation_store();
    let session = Session::new(&user_id);
    let mut chat = store.read_state(&session).await?;
    store.reset_booking_flags(&session, &mut chat).await?;

    Ok(Json(ChatView::new(&chat)))
}

/// Book a selection of the latest recommended tests or medicines
async fn booking_handler(
    State(state): State<SharedState>,
    Path((user_id, category)): Path<(String, String)>,
    Json(payload): Json<BookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Ok(category) = category.parse::<Category>() else {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("Unknown booking category {}", category),
        )
            .into_response());
    };

    let store = state
        .read()
        .expect("Unable to read share state")
        .conversation_store();
    let session = Session::new(&user_id);
    let mut chat = store.read_state(&session).await?;

    let Some(mut selection) = chat.selection(category) else {
        return Ok((
            StatusCode::CONFLICT,
            format!("Nothing to book for {}", category),
        )
            .into_response());
    };

    for item in &payload.selected {
        if let Err(e) = selection.toggle(item) {
            return Ok((StatusCode::BAD_REQUEST, e.to_string()).into_response());
        }
    }
    let booked = match selection.confirm() {
        Ok(booked) => booked,
        Err(e) => return Ok((StatusCode::BAD_REQUEST, e.to_string()).into_response()),
    };

    store.confirm_booking(&session, &mut chat, category).await?;
    tracing::info!("{} booked {}: {:?}", user_id, category, booked);

    Ok(Json(BookingResponse {
        booked,
        chat: ChatView::new(&chat),
    })
    .into_response())
}

/// Create the bookings router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/reset", post(reset_handler))
        .route("/{category}", post(booking_handler))
}
