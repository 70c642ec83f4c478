//! Decides which booking prompts to show under the latest assistant
//! reply.

use serde::Serialize;

use super::extract::{Recommendation, extract};
use super::models::{BookingFlags, Category, Transcript, TurnVersion};

pub const ALREADY_BOOKED_NOTICE: &str = "✅ Tests and medicines already booked.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordances {
    Hidden,
    TestsOnly,
    MedicinesOnly,
    Both,
    // Everything recommended was booked, show the notice instead
    AlreadyBooked,
}

impl Affordances {
    /// Categories the user can still act on.
    pub fn bookable(&self) -> Vec<Category> {
        match self {
            Affordances::TestsOnly => vec![Category::Tests],
            Affordances::MedicinesOnly => vec![Category::Medicines],
            Affordances::Both => vec![Category::Tests, Category::Medicines],
            Affordances::Hidden | Affordances::AlreadyBooked => vec![],
        }
    }

    pub fn allows(&self, category: Category) -> bool {
        self.bookable().contains(&category)
    }
}

pub fn reconcile(recommendation: &Recommendation, flags: &BookingFlags) -> Affordances {
    let has_tests = !recommendation.tests.is_empty();
    let has_meds = !recommendation.medicines.is_empty();
    let show_tests = has_tests && !flags.tests_booked;
    let show_meds = has_meds && !flags.meds_booked;

    match (show_tests, show_meds) {
        (true, true) => Affordances::Both,
        (true, false) => Affordances::TestsOnly,
        (false, true) => Affordances::MedicinesOnly,
        (false, false) if has_tests && has_meds => Affordances::AlreadyBooked,
        (false, false) => Affordances::Hidden,
    }
}

/// Booking prompts for one chat view. A new assistant turn hides the
/// prompts until the panel is settled for that turn's version; after
/// that they are re-derived from the flags on every render.
#[derive(Debug, Default)]
pub struct BookingPanel {
    settled: Option<TurnVersion>,
}

impl BookingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the latest assistant turn as rendered.
    pub fn settle(&mut self, transcript: &Transcript) {
        self.settled = transcript.version();
    }

    pub fn is_current(&self, transcript: &Transcript) -> bool {
        self.settled.is_some() && self.settled == transcript.version()
    }

    pub fn visible(&self, transcript: &Transcript, flags: &BookingFlags) -> Affordances {
        if !self.is_current(transcript) {
            return Affordances::Hidden;
        }
        match transcript.latest_assistant_text() {
            Some(text) => reconcile(&extract(text), flags),
            None => Affordances::Hidden,
        }
    }
}
