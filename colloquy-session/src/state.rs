//! Conversation state owned by a session.

use serde::{Deserialize, Serialize};

use crate::turn::{Origin, Turn};

/// The complete renderable state of one conversation.
///
/// Turns render top-to-bottom, oldest first. The list is append-only;
/// the only in-place mutation is content growth of the active assistant
/// turn, which is always the last element while `pending` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Ordered turns, oldest first.
    pub turns: Vec<Turn>,
    /// True while a stream is in flight; submissions are rejected until
    /// the turn settles.
    pub pending: bool,
    /// The error surfaced by the most recent submission, if any. Cleared
    /// when a new submission starts.
    pub last_error: Option<String>,
}

impl ConversationState {
    /// The assistant turn currently receiving appended content, if any.
    #[must_use]
    pub fn active_assistant(&self) -> Option<&Turn> {
        if !self.pending {
            return None;
        }
        self.turns
            .last()
            .filter(|turn| turn.origin == Origin::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        let state = ConversationState::default();
        assert!(state.turns.is_empty());
        assert!(!state.pending);
        assert_eq!(state.last_error, None);
        assert!(state.active_assistant().is_none());
    }

    #[test]
    fn active_assistant_requires_pending() {
        let state = ConversationState {
            turns: vec![Turn::user("hi"), Turn::assistant()],
            pending: false,
            last_error: None,
        };
        assert!(state.active_assistant().is_none());

        let state = ConversationState {
            pending: true,
            ..state
        };
        assert_eq!(
            state.active_assistant().map(|t| t.origin),
            Some(Origin::Assistant)
        );
    }
}
