//! Line-buffered decoder for the chat event stream.
//!
//! The agent server answers a chat request with a body of SSE-style
//! frames, one per line:
//!
//! ```text
//! data: {"event":"message_delta","message_id":"m1","delta":"He"}
//! data: {"event":"round_complete","messages":[...]}
//! data: [DONE]
//! ```
//!
//! Network chunks split frames at arbitrary byte offsets, so the buffer
//! retains the trailing incomplete line across feeds and drains complete
//! lines in a loop. Malformed payloads are dropped and logged -- a single
//! bad frame must never abort the stream. One decoder per HTTP response;
//! it is not restartable.

use std::fmt;

use futures_util::{Stream, StreamExt};

use mnema_types::error::ChatError;
use mnema_types::event::ChatStreamEvent;

/// Payload that terminates the stream without producing an event.
const DONE_SENTINEL: &str = "[DONE]";

/// Synchronous, incremental frame buffer.
///
/// Feed raw byte chunks in arrival order; complete `data:` lines are
/// parsed into events, everything else (blank lines, comments) is
/// ignored. After the `[DONE]` sentinel all further input is discarded.
#[derive(Debug, Default)]
pub struct SseFrameBuffer {
    buffer: Vec<u8>,
    terminated: bool,
}

impl SseFrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Feed one chunk and drain every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ChatStreamEvent> {
        let mut events = Vec::new();
        if self.terminated {
            return events;
        }
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            // Only `data:` lines carry payloads; the rest is framing noise.
            let Some(payload) = line.strip_prefix("data:") else {
                continue;
            };
            let payload = payload.strip_prefix(' ').unwrap_or(payload);

            if payload == DONE_SENTINEL {
                self.terminated = true;
                break;
            }

            match serde_json::from_str::<ChatStreamEvent>(payload) {
                Ok(event) => events.push(event),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping malformed stream frame");
                }
            }
        }

        events
    }
}

/// Decode a byte stream into a lazy, finite stream of protocol events.
///
/// Suspension occurs only at the underlying read; events are yielded in
/// arrival order. A transport error from the source surfaces once as
/// `ChatError::Transport` and ends the stream. Cancellation is simply
/// dropping the returned stream.
pub fn decode_chat_stream<S, B, E>(
    bytes: S,
) -> impl Stream<Item = Result<ChatStreamEvent, ChatError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    async_stream::stream! {
        let mut buffer = SseFrameBuffer::new();
        let mut bytes = std::pin::pin!(bytes);

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for event in buffer.feed(chunk.as_ref()) {
                        yield Ok(event);
                    }
                    if buffer.is_terminated() {
                        return;
                    }
                }
                Err(err) => {
                    yield Err(ChatError::Transport(err.to_string()));
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn delta(id: &str, text: &str) -> String {
        format!(r#"data: {{"event":"message_delta","message_id":"{id}","delta":"{text}"}}"#)
    }

    #[test]
    fn test_feed_complete_line() {
        let mut buffer = SseFrameBuffer::new();
        let events = buffer.feed(format!("{}\n", delta("m1", "Hi")).as_bytes());
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ChatStreamEvent::MessageDelta {
                message_id: Some("m1".to_string()),
                delta: "Hi".to_string(),
            }
        );
    }

    #[test]
    fn test_partial_line_reassembled_across_feeds() {
        let mut buffer = SseFrameBuffer::new();
        let line = format!("{}\n", delta("m1", "Hello"));
        let (left, right) = line.split_at(20);

        assert!(buffer.feed(left.as_bytes()).is_empty());
        let events = buffer.feed(right.as_bytes());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut buffer = SseFrameBuffer::new();
        let chunk = format!("{}\n{}\n", delta("m1", "He"), delta("m1", "llo"));
        let events = buffer.feed(chunk.as_bytes());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let mut buffer = SseFrameBuffer::new();
        let chunk = format!(
            "{}\ndata: {{not json!!\n{}\n",
            delta("m1", "He"),
            delta("m1", "llo")
        );
        let events = buffer.feed(chunk.as_bytes());
        assert_eq!(events.len(), 2);
        match &events[1] {
            ChatStreamEvent::MessageDelta { delta, .. } => assert_eq!(delta, "llo"),
            other => panic!("expected MessageDelta, got {other:?}"),
        }
    }

    #[test]
    fn test_done_sentinel_terminates() {
        let mut buffer = SseFrameBuffer::new();
        let chunk = format!("{}\ndata: [DONE]\n{}\n", delta("m1", "Hi"), delta("m1", "x"));
        let events = buffer.feed(chunk.as_bytes());
        assert_eq!(events.len(), 1);
        assert!(buffer.is_terminated());
        assert!(buffer.feed(format!("{}\n", delta("m1", "y")).as_bytes()).is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let mut buffer = SseFrameBuffer::new();
        let events = buffer.feed(format!("{}\r\n", delta("m1", "Hi")).as_bytes());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_data_prefix_without_space() {
        let mut buffer = SseFrameBuffer::new();
        let chunk = format!(
            "data:{}\n",
            r#"{"event":"message_delta","message_id":"m1","delta":"Hi"}"#
        );
        let events = buffer.feed(chunk.as_bytes());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let mut buffer = SseFrameBuffer::new();
        let chunk = format!("\n: keepalive\n{}\n\n", delta("m1", "Hi"));
        let events = buffer.feed(chunk.as_bytes());
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_decode_stream_yields_in_order() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(format!("{}\n", delta("m1", "He")).into_bytes()),
            Ok(format!("{}\ndata: [DONE]\n", delta("m1", "llo")).into_bytes()),
        ];
        let decoded = decode_chat_stream(stream::iter(chunks));
        let events: Vec<_> = decoded.collect::<Vec<_>>().await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.is_ok()));
    }

    #[tokio::test]
    async fn test_decode_stream_surfaces_transport_error() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(format!("{}\n", delta("m1", "He")).into_bytes()),
            Err(std::io::Error::other("connection reset")),
        ];
        let decoded = decode_chat_stream(stream::iter(chunks));
        let events: Vec<_> = decoded.collect::<Vec<_>>().await;
        assert_eq!(events.len(), 2);
        assert!(events[0].is_ok());
        match &events[1] {
            Err(ChatError::Transport(msg)) => assert!(msg.contains("connection reset")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_stream_ends_without_sentinel() {
        // Body exhaustion without [DONE] also ends the round cleanly.
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
            vec![Ok(format!("{}\n", delta("m1", "Hi")).into_bytes())];
        let decoded = decode_chat_stream(stream::iter(chunks));
        let events: Vec<_> = decoded.collect::<Vec<_>>().await;
        assert_eq!(events.len(), 1);
    }
}
