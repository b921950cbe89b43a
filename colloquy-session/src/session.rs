//! The conversation controller.

use colloquy_types::{Backend, ChatEvent, ChatRequest, SessionError, ToolInvocation};
use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::state::ConversationState;
use crate::turn::{Origin, Turn};

/// Controller for a single conversation.
///
/// Owns the conversation state exclusively: nothing mutates it outside the
/// `submit` flow, and `&mut self` plus the `pending` flag guarantee at most
/// one stream in flight. Events are applied strictly in the order the
/// decoder emits them; a state snapshot is published after every
/// application so a renderer can repaint progressively.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> Result<(), colloquy_types::SessionError> {
/// use colloquy_client::ChatClient;
/// use colloquy_session::ChatSession;
///
/// let mut session = ChatSession::new(ChatClient::new());
/// session.submit("Hello!").await?;
/// for turn in &session.state().turns {
///     println!("{:?}: {}", turn.origin, turn.content);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChatSession<B: Backend> {
    /// Transport to the remote endpoint.
    backend: B,
    /// Conversation identifier sent as `chatId` on every request.
    chat_id: String,
    /// The single mutable conversation state.
    state: ConversationState,
    /// Tool payloads received out-of-band; never rendered into turn text.
    tool_invocations: Vec<ToolInvocation>,
    /// Publishes a snapshot after every state mutation.
    watch_tx: watch::Sender<ConversationState>,
}

impl<B: Backend> ChatSession<B> {
    /// Create a session with a fresh conversation id and empty state.
    #[must_use]
    pub fn new(backend: B) -> Self {
        let state = ConversationState::default();
        let (watch_tx, _) = watch::channel(state.clone());
        Self {
            backend,
            chat_id: Uuid::new_v4().to_string(),
            state,
            tool_invocations: Vec::new(),
            watch_tx,
        }
    }

    /// The conversation identifier sent to the server.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Subscribe to state snapshots.
    ///
    /// A new snapshot is published after every event application, so a
    /// renderer can await changes while `submit` is in flight elsewhere.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.watch_tx.subscribe()
    }

    /// Tool payloads received so far, in arrival order.
    #[must_use]
    pub fn tool_invocations(&self) -> &[ToolInvocation] {
        &self.tool_invocations
    }

    /// Submit the user's text and fold the streamed reply into the state.
    ///
    /// Equivalent to [`submit_with`](Self::submit_with) with a token that
    /// is never cancelled.
    pub async fn submit(&mut self, text: &str) -> Result<(), SessionError> {
        self.submit_with(text, CancellationToken::new()).await
    }

    /// Submit with an external cancellation signal.
    ///
    /// Returns `Err` only for precondition rejections (empty text, already
    /// pending); those leave the state untouched. An accepted submission
    /// always resolves to a settled state: appended user turn, assistant
    /// turn with whatever content arrived, `pending` false, and
    /// `last_error` set when the stream failed or was cancelled. Transport
    /// and stream failures never surface as `Err` — they land in
    /// `last_error` so the caller can rerender and resubmit.
    ///
    /// Cancelling the token aborts the in-flight stream; dropping the
    /// event stream closes the underlying connection. Dropping the
    /// returned future itself (e.g. through `tokio::time::timeout`)
    /// settles the turn as cancelled, so the session stays usable.
    pub async fn submit_with(
        &mut self,
        text: &str,
        cancel: CancellationToken,
    ) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.state.pending {
            return Err(SessionError::Busy);
        }

        self.state.last_error = None;
        self.state.turns.push(Turn::user(text));
        self.state.turns.push(Turn::assistant());
        self.state.pending = true;
        self.publish();

        let request = ChatRequest {
            chat_id: Some(self.chat_id.clone()),
            message: text.to_string(),
            // Empty means "use the client's default model".
            model: String::new(),
        };

        tracing::debug!(chat_id = %self.chat_id, "submitting message");

        // From here on `pending` is true, so the turn must settle on every
        // exit path, including this future being dropped mid-await.
        let mut turn = TurnGuard {
            state: &mut self.state,
            tools: &mut self.tool_invocations,
            watch_tx: &self.watch_tx,
            settled: false,
        };

        let mut stream = match self.backend.open_stream(request).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to open chat stream");
                turn.settle(Some(e.to_string()));
                return Ok(());
            }
        };

        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::warn!(chat_id = %self.chat_id, "chat stream cancelled");
                    turn.settle(Some("cancelled".to_string()));
                    return Ok(());
                }
                event = stream.receiver.next() => event,
            };

            let Some(event) = event else {
                // Byte stream ended without an explicit terminal frame;
                // treat as end-of-turn.
                turn.settle(None);
                return Ok(());
            };

            match event {
                ChatEvent::Message { content } => turn.append(&content),
                ChatEvent::Tool { data } => {
                    tracing::debug!(
                        tool = data
                            .function
                            .as_ref()
                            .map(|f| f.name.as_str())
                            .unwrap_or("unknown"),
                        "recorded tool invocation"
                    );
                    turn.record_tool(data);
                }
                ChatEvent::Error { message } => {
                    tracing::warn!(error = %message, "chat stream failed");
                    turn.settle(Some(message));
                    return Ok(());
                }
                ChatEvent::Done => {
                    turn.settle(None);
                    return Ok(());
                }
            }
        }
    }

    fn publish(&self) {
        self.watch_tx.send_replace(self.state.clone());
    }
}

/// Scoped access to an in-flight turn.
///
/// Holds the session fields the fold loop mutates, and guarantees the turn
/// settles exactly once: explicitly via [`settle`](TurnGuard::settle), or
/// on drop when the `submit` future is abandoned before reaching it. The
/// invariant that `pending` implies a stream in flight survives callers
/// that time out or drop the future.
struct TurnGuard<'a> {
    state: &'a mut ConversationState,
    tools: &'a mut Vec<ToolInvocation>,
    watch_tx: &'a watch::Sender<ConversationState>,
    settled: bool,
}

impl TurnGuard<'_> {
    /// Append a fragment to the assistant turn receiving content.
    ///
    /// While pending this is always the last turn; the check is structural
    /// rather than an index so the invariant is enforced, not assumed.
    fn append(&mut self, content: &str) {
        if let Some(turn) = self
            .state
            .turns
            .last_mut()
            .filter(|turn| turn.origin == Origin::Assistant)
        {
            turn.content.push_str(content);
        }
        self.publish();
    }

    /// Record an out-of-band tool payload.
    fn record_tool(&mut self, data: ToolInvocation) {
        self.tools.push(data);
        self.publish();
    }

    /// End the turn and publish the settled state.
    fn settle(mut self, error: Option<String>) {
        self.state.pending = false;
        self.state.last_error = error;
        self.settled = true;
        self.publish();
    }

    fn publish(&self) {
        self.watch_tx.send_replace(self.state.clone());
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.pending = false;
            self.state.last_error = Some("cancelled".to_string());
            self.watch_tx.send_replace(self.state.clone());
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
