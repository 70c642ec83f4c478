//! Pulls the recommended tests and medicines out of an assistant
//! reply. Replies are free text from an LLM so nothing here can fail:
//! a missing section is just an empty list.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::models::Category;

pub const TESTS_HEADER: &str = "Recommended Tests:";
pub const MEDICINES_HEADER: &str = "Suggested Medicines:";

// Any run of bullet markers and the whitespace around them
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•*\s]+").expect("Invalid bullet regex"));

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub tests: Vec<String>,
    pub medicines: Vec<String>,
}

impl Recommendation {
    pub fn items(&self, category: Category) -> &[String] {
        match category {
            Category::Tests => &self.tests,
            Category::Medicines => &self.medicines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && self.medicines.is_empty()
    }
}

/// Strip leading bullet markers (`-`, `•`, `*`) and surrounding
/// whitespace from a single line.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

fn bullet_items(section: &str) -> Vec<String> {
    section
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn extract(text: &str) -> Recommendation {
    let clean = text.replace("**", "");
    let clean = clean.trim();

    let tests = match clean.split_once(TESTS_HEADER) {
        Some((_, rest)) => {
            let section = rest
                .split_once(MEDICINES_HEADER)
                .map_or(rest, |(section, _)| section);
            bullet_items(section)
        }
        None => vec![],
    };

    let medicines = match clean.split_once(MEDICINES_HEADER) {
        Some((_, rest)) => bullet_items(rest),
        None => vec![],
    };

    Recommendation { tests, medicines }
}
