//! Per-user chat transcripts and booking flags.

use anyhow::{Error, Result};
use serde::Serialize;

use super::booking::{Affordances, reconcile};
use super::extract::{Recommendation, extract};
use super::models::{BookingFlags, Category, Transcript, Turn};
use super::selection::BookingSelection;
use crate::ai::prompt::symptom_triage_prompt;
use crate::auth::Session;
use crate::core::AppConfig;
use crate::kv::{KvStore, StorageKey};
use crate::openai::{ChatReply, Endpoint, Message, Role, chat};

pub const MALFORMED_REPLY: &str = "AI could not process the request. Try again later.";
pub const FAILED_REPLY: &str = "Sorry, something went wrong. Try again later.";

/// What the chat view holds in memory for the signed in user.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChatState {
    pub transcript: Transcript,
    pub flags: BookingFlags,
}

impl ChatState {
    /// State of a chat that has never been used.
    pub fn greeting() -> Self {
        Self {
            transcript: Transcript::greeting(),
            flags: BookingFlags::default(),
        }
    }

    /// What the latest assistant turn recommends.
    pub fn recommendation(&self) -> Recommendation {
        self.transcript
            .latest_assistant_text()
            .map(extract)
            .unwrap_or_default()
    }

    pub fn affordances(&self) -> Affordances {
        reconcile(&self.recommendation(), &self.flags)
    }

    /// Start booking `category` from the latest recommendation, if
    /// there is anything left to book for it.
    pub fn selection(&self, category: Category) -> Option<BookingSelection> {
        if !self.affordances().allows(category) {
            return None;
        }
        let items = self.recommendation().items(category).to_vec();
        Some(BookingSelection::new(category, items))
    }
}

pub struct ConversationStore<K: KvStore> {
    kv: K,
    endpoint: Endpoint,
    system_message: String,
}

impl<K: KvStore> ConversationStore<K> {
    pub fn new(kv: K, endpoint: Endpoint, system_message: &str) -> Self {
        Self {
            kv,
            endpoint,
            system_message: system_message.to_string(),
        }
    }

    pub fn from_config(kv: K, config: &AppConfig) -> Self {
        let endpoint = Endpoint {
            api_hostname: config.openai_api_hostname.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            referer: Some(config.app_referer.clone()),
            title: Some(config.app_title.clone()),
        };
        Self::new(kv, endpoint, &config.system_message)
    }

    async fn read_transcript(&self, user_id: &str) -> Result<Transcript, Error> {
        let transcript = match self.kv.get(&StorageKey::chat_history(user_id)).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => Transcript::greeting(),
        };
        Ok(transcript)
    }

    async fn read_flags(&self, user_id: &str) -> Result<BookingFlags, Error> {
        let mut flags = BookingFlags::default();
        for category in Category::ALL {
            let value = self.kv.get(&StorageKey::booked(category, user_id)).await?;
            flags.set(category, value.as_deref() == Some("true"));
        }
        Ok(flags)
    }

    async fn write_transcript(&self, user_id: &str, transcript: &Transcript) -> Result<(), Error> {
        let json = serde_json::to_string(transcript)?;
        self.kv.set(&StorageKey::chat_history(user_id), &json).await
    }

    /// The user's persisted history and flags. Callers that are about to
    /// write use this so an unreadable history is never overwritten.
    pub async fn read_state(&self, session: &Session) -> Result<ChatState, Error> {
        let transcript = self.read_transcript(&session.user_id).await?;
        let flags = self.read_flags(&session.user_id).await?;
        Ok(ChatState { transcript, flags })
    }

    /// Replace `state` with the user's persisted history and flags. A
    /// failed read is logged and leaves `state` as it was.
    pub async fn load(&self, session: &Session, state: &mut ChatState) {
        match self.read_state(session).await {
            Ok(loaded) => *state = loaded,
            Err(e) => tracing::error!(
                "Failed to load chat history or booking status for {}: {}",
                session.user_id,
                e
            ),
        }
    }

    /// Re-read only the booking flags, e.g. when returning to the chat
    /// after a booking flow.
    pub async fn refresh_booking_flags(&self, session: &Session, state: &mut ChatState) {
        match self.read_flags(&session.user_id).await {
            Ok(flags) => state.flags = flags,
            Err(e) => tracing::error!(
                "Failed to refresh booking status for {}: {}",
                session.user_id,
                e
            ),
        }
    }

    /// Append a user turn and persist it. Returns false when the text
    /// was blank and nothing happened.
    pub async fn append_user_turn(
        &self,
        session: &Session,
        state: &mut ChatState,
        text: &str,
    ) -> Result<bool, Error> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        state.transcript.push(Turn::user(text));
        self.write_transcript(&session.user_id, &state.transcript)
            .await?;
        Ok(true)
    }

    /// Ask the completion endpoint for a triage of `latest_user_text`
    /// and append the assistant turn. Never fails: endpoint problems
    /// become a fallback turn and leave the booking flags alone.
    pub async fn request_assistant_reply(
        &self,
        session: &Session,
        state: &mut ChatState,
        latest_user_text: &str,
    ) -> Turn {
        let reply = match symptom_triage_prompt(latest_user_text) {
            Ok(prompt) => {
                let messages = vec![
                    Message::new(Role::System, &self.system_message),
                    Message::new(Role::User, &prompt),
                ];
                chat(&messages, &self.endpoint).await
            }
            Err(e) => ChatReply::Failed(e),
        };

        let (turn, succeeded) = match reply {
            ChatReply::Content(content) => (Turn::assistant(content.trim()), true),
            ChatReply::Malformed(resp) => {
                tracing::error!("Completion response error: {}", resp);
                (Turn::assistant(MALFORMED_REPLY), false)
            }
            ChatReply::Failed(e) => {
                tracing::error!("Completion request error: {}", e);
                (Turn::assistant(FAILED_REPLY), false)
            }
        };

        state.transcript.push(turn.clone());
        if let Err(e) = self
            .write_transcript(&session.user_id, &state.transcript)
            .await
        {
            tracing::error!("Failed to save chat history for {}: {}", session.user_id, e);
        }

        // A new recommendation always gets fresh booking prompts
        if succeeded {
            if let Err(e) = self.reset_booking_flags(session, state).await {
                tracing::error!("Failed to reset booking status for {}: {}", session.user_id, e);
            }
        }

        turn
    }

    /// Append the user's message and, if it wasn't blank, get the
    /// assistant's reply to it.
    pub async fn send(
        &self,
        session: &Session,
        state: &mut ChatState,
        text: &str,
    ) -> Result<Option<Turn>, Error> {
        if !self.append_user_turn(session, state, text).await? {
            return Ok(None);
        }
        let turn = self.request_assistant_reply(session, state, text).await;
        Ok(Some(turn))
    }

    /// Clear both booking flags. The two keys are removed one after
    /// the other, not atomically.
    pub async fn reset_booking_flags(
        &self,
        session: &Session,
        state: &mut ChatState,
    ) -> Result<(), Error> {
        for category in Category::ALL {
            state.flags.set(category, false);
            self.kv
                .remove(&StorageKey::booked(category, &session.user_id))
                .await?;
        }
        Ok(())
    }

    pub async fn confirm_booking(
        &self,
        session: &Session,
        state: &mut ChatState,
        category: Category,
    ) -> Result<(), Error> {
        state.flags.set(category, true);
        self.kv
            .set(&StorageKey::booked(category, &session.user_id), "true")
            .await?;
        tracing::info!("Booked {} for {}", category, session.user_id);
        Ok(())
    }
}
