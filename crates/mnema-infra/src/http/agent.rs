//! HttpAgentTransport -- concrete [`AgentTransport`] over the chat
//! endpoint.
//!
//! Sends `POST /api/chat/chat` with the full message history and decodes
//! the streamed response body into protocol events. The HTTP status is
//! checked before any event is yielded; a non-success status surfaces as
//! a single `ChatError::Service` item.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use mnema_core::client::AgentTransport;
use mnema_core::stream::decode_chat_stream;
use mnema_types::error::ChatError;
use mnema_types::event::{ChatRequest, ChatStreamEvent};

/// Streaming chat transport for the agent server.
pub struct HttpAgentTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentTransport {
    /// Create a transport for the given server base URL.
    ///
    /// No total-request timeout is set: a round streams for as long as
    /// the agent keeps working, and a broken connection still errors out
    /// of the body read.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            base_url: super::trim_base_url(base_url.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AgentTransport for HttpAgentTransport {
    fn chat(
        &self,
        request: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, ChatError>> + Send + 'static>> {
        let client = self.client.clone();
        let url = self.url("/api/chat/chat");

        Box::pin(async_stream::stream! {
            let response = match client.post(&url).json(&request).send().await {
                Ok(response) => response,
                Err(err) => {
                    yield Err(ChatError::Transport(format!("HTTP request failed: {err}")));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!(status = %status, body = %message, "chat request failed");
                yield Err(ChatError::Service {
                    status: status.as_u16(),
                    message,
                });
                return;
            }

            let bytes = response.bytes_stream();
            let mut events = std::pin::pin!(decode_chat_stream(bytes));
            while let Some(item) = events.next().await {
                yield item;
            }
        })
    }
}
