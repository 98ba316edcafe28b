//! Active-node context: the MRU window and the pending attachment queue.

pub mod pending;
pub mod window;

pub use pending::PendingNodes;
pub use window::{ContextWindow, DEFAULT_CONTEXT_CAPACITY};
