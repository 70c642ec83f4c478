//! API routes module
//!
//! Routes under `/users/{user_id}` act as whichever user the path
//! names. Nothing here checks an id token against that user, so the
//! API must sit behind something that authenticates the caller and
//! only lets them reach their own `user_id`.

pub mod auth;
pub mod bookings;
pub mod chat;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Sign up and sign in
        .nest("/auth", auth::router())
        // Per-user chat transcript
        .nest("/users/{user_id}/chat", chat::router())
        // Booking recommended tests and medicines
        .nest("/users/{user_id}/bookings", bookings::router())
}
