use serde_json::Value;

use crate::openai::{Endpoint, Message, completion};

/// Result of asking for the next assistant turn. Failures are values
/// here because the conversation carries on either way.
#[derive(Debug)]
pub enum ChatReply {
    Content(String),
    // The endpoint answered but not with a completion, e.g. an
    // `{"error": ..}` object for a bad key or an unknown model
    Malformed(Value),
    Failed(anyhow::Error),
}

/// Runs the next turn in chat by passing a transcript to the LLM for
/// the next response.
pub async fn chat(history: &[Message], endpoint: &Endpoint) -> ChatReply {
    let resp = match completion(history, endpoint).await {
        Ok(resp) => resp,
        Err(e) => return ChatReply::Failed(e),
    };

    match resp["choices"][0]["message"]["content"].as_str() {
        Some(msg) => ChatReply::Content(msg.to_string()),
        None => ChatReply::Malformed(resp),
    }
}
