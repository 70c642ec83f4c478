pub mod booking;
pub mod extract;
mod models;
pub mod selection;
pub mod store;

pub use booking::{Affordances, BookingPanel, reconcile};
pub use extract::{Recommendation, extract};
pub use models::*;
pub use selection::BookingSelection;
pub use store::{ChatState, ConversationStore};
