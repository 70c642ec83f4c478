use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const GREETING: &str = "👋 Hello! I’m your medical assistant. How can I help you today?";

// Stored histories use "ai" for the assistant
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Speaker {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

/// One message in the conversation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Turn {
    #[serde(rename = "role")]
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: &str) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.to_string(),
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.to_string(),
        }
    }
}

/// Identifies the latest assistant turn of a transcript. Two
/// transcripts with the same token show the same recommendation.
///
/// `digest` is the leading 32 bits of the SHA-256 of the turn's text.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, Hash)]
pub struct TurnVersion {
    pub index: usize,
    pub digest: u32,
}

fn text_digest(text: &str) -> u32 {
    let hash = Sha256::digest(text.as_bytes());
    u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self(turns)
    }

    /// History for someone who has never chatted before.
    pub fn greeting() -> Self {
        Self(vec![Turn::assistant(GREETING)])
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    fn latest_assistant(&self) -> Option<(usize, &Turn)> {
        self.0
            .iter()
            .enumerate()
            .rev()
            .find(|(_, t)| t.speaker == Speaker::Assistant)
    }

    pub fn latest_assistant_text(&self) -> Option<&str> {
        self.latest_assistant().map(|(_, t)| t.text.as_str())
    }

    pub fn version(&self) -> Option<TurnVersion> {
        self.latest_assistant().map(|(index, turn)| TurnVersion {
            index,
            digest: text_digest(&turn.text),
        })
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct BookingFlags {
    pub tests_booked: bool,
    pub meds_booked: bool,
}

impl BookingFlags {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Tests => self.tests_booked,
            Category::Medicines => self.meds_booked,
        }
    }

    pub fn set(&mut self, category: Category, booked: bool) {
        match category {
            Category::Tests => self.tests_booked = booked,
            Category::Medicines => self.meds_booked = booked,
        }
    }
}

/// The two kinds of things an assistant reply can recommend.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tests,
    Medicines,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Tests, Category::Medicines];

    /// Singular noun used in user facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Category::Tests => "test",
            Category::Medicines => "medicine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Category::Tests => write!(f, "tests"),
            Category::Medicines => write!(f, "medicines"),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tests" | "test" => Ok(Category::Tests),
            "medicines" | "medicine" | "meds" => Ok(Category::Medicines),
            other => Err(anyhow!("Unknown booking category: {}", other)),
        }
    }
}
