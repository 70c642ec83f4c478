//! Typed keys for the key-value table. Every per-user entry goes
//! through here so a key can't be built without the user it belongs
//! to.

use std::fmt;

use crate::triage::Category;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageKey {
    ChatHistory(String),
    Booked(Category, String),
    CurrentUser,
    // Unscoped flags from older clients. Only used to delete them.
    LegacyBooked(Category),
}

impl StorageKey {
    pub fn chat_history(user_id: &str) -> Self {
        StorageKey::ChatHistory(user_id.to_string())
    }

    pub fn booked(category: Category, user_id: &str) -> Self {
        StorageKey::Booked(category, user_id.to_string())
    }

    pub fn legacy_keys() -> [StorageKey; 2] {
        [
            StorageKey::LegacyBooked(Category::Tests),
            StorageKey::LegacyBooked(Category::Medicines),
        ]
    }
}

fn flag_prefix(category: &Category) -> &'static str {
    match category {
        Category::Tests => "testsBooked",
        Category::Medicines => "medsBooked",
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageKey::ChatHistory(user_id) => write!(f, "chatHistory_{}", user_id),
            StorageKey::Booked(category, user_id) => {
                write!(f, "{}_{}", flag_prefix(category), user_id)
            }
            StorageKey::CurrentUser => write!(f, "currentUser"),
            StorageKey::LegacyBooked(category) => write!(f, "{}", flag_prefix(category)),
        }
    }
}
