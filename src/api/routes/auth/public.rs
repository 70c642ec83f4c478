//! Public types for the auth API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sent back when sign up or sign in fails, `message` is the
/// provider's message unchanged.
#[derive(Serialize)]
pub struct AuthFailure {
    pub error: String,
    pub message: String,
}
