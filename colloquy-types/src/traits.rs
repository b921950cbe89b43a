//! Backend trait for chat transports.
//!
//! The [`Backend`] trait uses RPITIT (return-position `impl Trait` in
//! traits) and is intentionally NOT object-safe. Sessions are generic over
//! their backend — `ChatSession<B: Backend>` — so test code can substitute
//! stubs that replay canned event sequences.

use std::future::Future;

use crate::error::ClientError;
use crate::stream::EventStream;
use crate::types::{ChatRequest, ChatResponse};

/// Transport interface to the remote chat endpoint.
///
/// Implemented by the HTTP client in `colloquy-client`. The streaming path
/// is the primary one; [`send`](Backend::send) is the non-streaming
/// convenience for callers that want the whole reply at once.
pub trait Backend: Send + Sync {
    /// Send a request and wait for the complete reply.
    fn send(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ClientError>> + Send;

    /// Open a streaming response for the request.
    ///
    /// Returns an [`EventStream`] whose receiver emits decoded
    /// [`ChatEvent`](crate::ChatEvent)s in wire order. An `Err` here means
    /// the stream never opened (non-success status or transport failure
    /// before any bytes); failures after streaming began are delivered
    /// in-band as [`ChatEvent::Error`](crate::ChatEvent::Error).
    fn open_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<EventStream, ClientError>> + Send;
}
