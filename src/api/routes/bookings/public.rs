//! Public types for the bookings API
use serde::{Deserialize, Serialize};

use crate::api::routes::chat::public::ChatView;

#[derive(Deserialize)]
pub struct BookingRequest {
    pub selected: Vec<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub booked: Vec<String>,
    pub chat: ChatView,
}
