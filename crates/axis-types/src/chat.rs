//! Conversation types for Axis.
//!
//! A [`ConversationRecord`] is written once per successful model invocation
//! and never mutated afterwards.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Alias used when a chat request names no model.
pub const DEFAULT_MODEL_ALIAS: &str = "llama-70b";

/// One persisted query/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text_query: String,
    pub response_text: String,
    /// The alias the user asked for, not the backend model identifier.
    pub llm_model_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields supplied by the caller when appending a record.
///
/// The store assigns `id` and `timestamp` as part of the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    pub user_id: Uuid,
    pub text_query: String,
    pub response_text: String,
    pub llm_model_name: String,
}

impl NewConversation {
    /// Stamp the draft with a fresh UUID v7 and the current time.
    pub fn into_record(self) -> ConversationRecord {
        ConversationRecord {
            id: Uuid::now_v7(),
            user_id: self.user_id,
            text_query: self.text_query,
            response_text: self.response_text,
            llm_model_name: self.llm_model_name,
            timestamp: Utc::now(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl ChatRequest {
    /// Fill in the fallback alias when no model was named.
    pub fn apply_defaults(&mut self) {
        if self.model.trim().is_empty() {
            self.model = DEFAULT_MODEL_ALIAS.to_owned();
        }
    }
}

/// Query of `GET /chat/models`. Takes no parameters; unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ModelsQuery {}

/// A short model name and the backend identifier it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelAlias {
    pub name: String,
    pub model: String,
}

/// Text produced by a model backend and how long it took end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub elapsed: Duration,
}

impl Generation {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
