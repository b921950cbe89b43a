//! Chat API client struct and builder.

use std::future::Future;

use colloquy_types::{Backend, ChatRequest, ChatResponse, ClientError, EventStream};

use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::stream_events;

/// Default model used when the request does not specify one.
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// Default chat backend base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client for the chat backend API.
///
/// Implements [`Backend`] for use anywhere a transport is accepted.
///
/// # Example
///
/// ```no_run
/// use colloquy_client::ChatClient;
///
/// let client = ChatClient::new()
///     .model("gpt-4-turbo-preview")
///     .base_url("http://localhost:8080");
/// ```
pub struct ChatClient {
    /// Default model identifier used when the request does not specify one.
    pub(crate) model: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client with sensible defaults.
    ///
    /// Default model: `gpt-4-turbo-preview`.
    /// Default base URL: `http://localhost:8080`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the default model.
    ///
    /// This is used when [`ChatRequest::model`] is empty.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or an API proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Build the non-streaming chat endpoint URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Build the streaming chat endpoint URL.
    pub(crate) fn stream_url(&self) -> String {
        format!("{}/api/chat/stream", self.base_url)
    }

    /// Fill in the default model when the request leaves it empty.
    ///
    /// The backend rejects requests without a model, so the client never
    /// sends an empty one.
    fn prepare(&self, mut request: ChatRequest) -> ChatRequest {
        if request.model.is_empty() {
            request.model = self.model.clone();
        }
        request
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ChatClient {
    /// Send a chat request and wait for the complete reply.
    ///
    /// The backend reports its own failures in-band: a 200 body with an
    /// `error` field instead of a `message`. Both arrive here as an `Ok`
    /// [`ChatResponse`]; only transport failures become `Err`.
    fn send(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ClientError>> + Send {
        let url = self.chat_url();
        let body = self.prepare(request);
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "sending chat request");

            let response = http_client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let text = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                return Err(map_http_status(status, &text));
            }

            serde_json::from_str(&text)
                .map_err(|e| ClientError::InvalidResponse(format!("invalid JSON response: {e}")))
        }
    }

    /// Open a streaming chat response.
    ///
    /// Returns an [`EventStream`] whose receiver emits decoded
    /// [`ChatEvent`](colloquy_types::ChatEvent)s as frames arrive.
    fn open_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<EventStream, ClientError>> + Send {
        let url = self.stream_url();
        let body = self.prepare(request);
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "opening chat stream");

            let response = http_client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response.text().await.map_err(map_reqwest_error)?;
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_events(response))
        }
    }
}
