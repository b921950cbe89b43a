//! Frame decoding for the chat stream endpoint.
//!
//! The server emits one frame per blank-line-delimited segment:
//!
//! ```text
//! data: {"type":"message","content":"Hel"}
//!
//! data: {"type":"message","content":"lo"}
//!
//! data: {"type":"done"}
//! ```
//!
//! The transport delivers raw byte chunks with no alignment to frame
//! boundaries, so the decoder re-buffers both incomplete UTF-8 sequences
//! and unterminated segments across chunks. It holds no conversation
//! state: it is purely a framing/parsing transform.

use bytes::BytesMut;
use colloquy_types::{ChatEvent, EventStream, ToolInvocation};
use futures::{Stream, StreamExt};
use reqwest::Response;
use serde::Deserialize;

/// Frame field prefix; segments without it are discarded.
const DATA_PREFIX: &str = "data: ";

/// Wrap an HTTP response body into an [`EventStream`] of [`ChatEvent`]s.
///
/// The response body is consumed as a byte stream and decoded
/// incrementally. Dropping the returned handle drops the response and
/// closes the connection.
pub(crate) fn stream_events(response: Response) -> EventStream {
    EventStream {
        receiver: Box::pin(decode_stream(response.bytes_stream())),
    }
}

/// Decode a raw byte stream into a stream of [`ChatEvent`]s.
///
/// The decoded stream ends when a terminal frame (`error` or `done`) is
/// emitted, when the byte stream fails, or when it ends. A byte stream
/// that ends without a terminal frame simply ends the event stream — no
/// implicit `done` is synthesized; the session treats decoder end as
/// end-of-turn.
pub(crate) fn decode_stream<S, E>(byte_stream: S) -> impl Stream<Item = ChatEvent> + Send + 'static
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut buf = FrameBuffer::new();
        let mut byte_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield ChatEvent::Error {
                        message: format!("stream read error: {e}"),
                    };
                    return;
                }
            };

            let events = match buf.push(&chunk) {
                Ok(events) => events,
                Err(message) => {
                    yield ChatEvent::Error { message };
                    return;
                }
            };

            for event in events {
                let terminal = event.is_terminal();
                yield event;
                if terminal {
                    return;
                }
            }
        }

        // The producer ended without a terminal frame. Flush any complete
        // trailing segment that was never blank-line-terminated.
        if let Some(event) = buf.finish() {
            yield event;
        }
    }
}

/// Buffers partial frames across byte chunks.
///
/// Bytes accumulate until they form valid UTF-8; decoded text accumulates
/// until a blank line terminates a segment. Feeding the same byte sequence
/// split at any offsets yields the same frames.
struct FrameBuffer {
    /// Undecoded bytes; at most the trailing bytes of one multi-byte
    /// character remain here between chunks.
    bytes: BytesMut,
    /// Decoded text of the unterminated trailing segment.
    text: String,
}

impl FrameBuffer {
    fn new() -> Self {
        Self {
            bytes: BytesMut::new(),
            text: String::new(),
        }
    }

    /// Feed one chunk and return the events completed by it.
    ///
    /// `Err` means the stream contains bytes that can never become valid
    /// UTF-8 (corruption, not a split character) and decoding cannot
    /// continue.
    fn push(&mut self, chunk: &[u8]) -> Result<Vec<ChatEvent>, String> {
        self.bytes.extend_from_slice(chunk);

        let valid_len = match std::str::from_utf8(&self.bytes) {
            Ok(_) => self.bytes.len(),
            // error_len() of None marks an incomplete trailing sequence,
            // which a later chunk may finish.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(format!("invalid UTF-8 in stream: {e}")),
        };
        if valid_len > 0 {
            let decoded = self.bytes.split_to(valid_len);
            // The split point is on a character boundary, so this is lossless.
            self.text.push_str(&String::from_utf8_lossy(&decoded));
        }

        let mut events = Vec::new();
        while let Some(pos) = self.text.find("\n\n") {
            let segment = self.text[..pos].to_string();
            self.text.drain(..pos + 2);
            if let Some(event) = parse_frame(&segment) {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Flush the trailing segment after the byte stream has ended.
    ///
    /// Safe to parse at this point: no later chunk can extend it.
    fn finish(&mut self) -> Option<ChatEvent> {
        let rest = std::mem::take(&mut self.text);
        parse_frame(rest.trim_end_matches('\n'))
    }
}

/// Payload of one `data: ` frame.
#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    error: Option<String>,
    data: Option<ToolInvocation>,
}

/// Parse one blank-line-delimited segment into an event.
///
/// Returns `None` for segments without the `data: ` prefix, payloads that
/// do not parse (expected for fragments of a still-incoming frame), and
/// unrecognized event types. None of these are fatal.
fn parse_frame(segment: &str) -> Option<ChatEvent> {
    let payload = segment.strip_prefix(DATA_PREFIX)?;
    let frame: Frame = serde_json::from_str(payload).ok()?;
    match frame.kind.as_str() {
        "message" => frame
            .content
            .filter(|content| !content.is_empty())
            .map(|content| ChatEvent::Message { content }),
        "tool" => frame.data.map(|data| ChatEvent::Tool { data }),
        "error" => Some(ChatEvent::Error {
            message: frame
                .error
                .unwrap_or_else(|| "unknown server error".to_string()),
        }),
        "done" => Some(ChatEvent::Done),
        other => {
            tracing::debug!(kind = other, "ignoring unrecognized stream event");
            None
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
