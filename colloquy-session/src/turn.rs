//! Conversation turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The local user.
    User,
    /// The remote assistant.
    Assistant,
}

/// One message in the conversation.
///
/// User turns are written once. Assistant turns start empty and grow by
/// append while their stream is in flight, then freeze. `id`, `origin`,
/// and `created_at` never change after creation, and no turn is ever
/// removed from a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Unique identifier, stable for the turn's lifetime.
    pub id: Uuid,
    /// Who authored the turn.
    pub origin: Origin,
    /// Accumulated text.
    pub content: String,
    /// When the turn was created.
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a user turn with its final content.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: Origin::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Create an empty assistant placeholder, ready to receive appends.
    #[must_use]
    pub fn assistant() -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: Origin::Assistant,
            content: String::new(),
            created_at: Utc::now(),
        }
    }
}
