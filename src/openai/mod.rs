mod chat;
mod core;

pub use self::chat::{ChatReply, chat};
pub use self::core::{Endpoint, Message, Role, completion};
