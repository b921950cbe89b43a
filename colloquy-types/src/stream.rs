//! Streaming event types for incremental chat responses.

use std::pin::Pin;

use futures::Stream;

use crate::types::ToolInvocation;

/// An event decoded from the chat response stream.
///
/// Events arrive in the exact order their frames appeared on the wire.
/// [`Error`](ChatEvent::Error) and [`Done`](ChatEvent::Done) are terminal:
/// no further events follow them for the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A fragment of assistant text to append.
    Message {
        /// The text fragment.
        content: String,
    },
    /// An out-of-band tool call payload. Carries no displayable text.
    Tool {
        /// The forwarded tool call.
        data: ToolInvocation,
    },
    /// The server signaled a failure. Terminal.
    Error {
        /// Human-readable failure description.
        message: String,
    },
    /// Explicit end-of-turn marker. Terminal.
    Done,
}

impl ChatEvent {
    /// Whether this event ends the stream for the current turn.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::Error { .. } | ChatEvent::Done)
    }
}

/// Handle to a decoded chat response stream.
///
/// Dropping the handle drops the underlying HTTP response, closing the
/// connection even when the stream has not been fully consumed.
pub struct EventStream {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = ChatEvent> + Send>>,
}

// The boxed stream is opaque, so there is nothing useful to show beyond
// the type itself. A Debug impl is still required for `Result` combinators
// like `unwrap_err` in tests.
impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_stream_is_debuggable() {
        let stream = EventStream {
            receiver: Box::pin(futures::stream::empty()),
        };
        assert_eq!(format!("{stream:?}"), "EventStream { .. }");
        // Debug is what Result combinators like unwrap_err need.
        let result: Result<EventStream, String> = Err("no".into());
        assert_eq!(result.unwrap_err(), "no");
    }

    #[test]
    fn terminal_events() {
        assert!(ChatEvent::Done.is_terminal());
        assert!(
            ChatEvent::Error {
                message: "boom".into()
            }
            .is_terminal()
        );
        assert!(
            !ChatEvent::Message {
                content: "hi".into()
            }
            .is_terminal()
        );
        assert!(
            !ChatEvent::Tool {
                data: ToolInvocation {
                    id: None,
                    kind: None,
                    function: None,
                }
            }
            .is_terminal()
        );
    }
}
