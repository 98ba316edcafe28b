//! Chat stream decoding.

pub mod decoder;

pub use decoder::{SseFrameBuffer, decode_chat_stream};
