//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::triage::booking::ALREADY_BOOKED_NOTICE;
use crate::triage::{
    Affordances, BookingFlags, ChatState, Recommendation, Transcript, TurnVersion,
};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Everything a client needs to render the chat screen.
#[derive(Serialize)]
pub struct ChatView {
    pub transcript: Transcript,
    pub flags: BookingFlags,
    pub recommendation: Recommendation,
    pub affordances: Affordances,
    pub notice: Option<String>,
    // Clients compare this against the version they last rendered
    // to know whether the booking prompts belong to a new reply
    pub version: Option<TurnVersion>,
}

impl ChatView {
    pub fn new(state: &ChatState) -> Self {
        let recommendation = state.recommendation();
        let affordances = state.affordances();
        let notice = match affordances {
            Affordances::AlreadyBooked => Some(ALREADY_BOOKED_NOTICE.to_string()),
            _ => None,
        };
        Self {
            transcript: state.transcript.clone(),
            flags: state.flags,
            recommendation,
            affordances,
            notice,
            version: state.transcript.version(),
        }
    }
}
