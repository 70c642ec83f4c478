//! Router for the auth API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use super::public::{AuthFailure, Credentials};
use crate::api::state::AppState;
use crate::auth::{AuthAction, validate_credentials};

type SharedState = Arc<RwLock<AppState>>;

async fn authenticate(state: SharedState, action: AuthAction, creds: Credentials) -> impl IntoResponse {
    let failure = |status: StatusCode, message: String| {
        let body = AuthFailure {
            error: action.failure_title().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    };

    if let Err(e) = validate_credentials(action, &creds.email, &creds.password) {
        return failure(StatusCode::BAD_REQUEST, e.to_string());
    }

    let client = state
        .read()
        .expect("Unable to read share state")
        .identity_client();

    match client
        .authenticate(action, &creds.email, &creds.password)
        .await
    {
        Ok(session) => {
            tracing::info!("{:?} succeeded for {}", action, session.user_id);
            Json(session).into_response()
        }
        Err(e) => {
            tracing::warn!("{:?} failed for {}: {}", action, creds.email, e);
            failure(StatusCode::UNAUTHORIZED, e.to_string())
        }
    }
}

async fn signup_handler(
    State(state): State<SharedState>,
    Json(creds): Json<Credentials>,
) -> impl IntoResponse {
    authenticate(state, AuthAction::SignUp, creds).await
}

async fn login_handler(
    State(state): State<SharedState>,
    Json(creds): Json<Credentials>,
) -> impl IntoResponse {
    authenticate(state, AuthAction::SignIn, creds).await
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
}
