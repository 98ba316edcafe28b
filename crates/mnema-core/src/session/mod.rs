//! Session state: canonical history, display reconciliation, and the
//! controller that drives a round end to end.

pub mod controller;
pub mod display;
pub mod history;

pub use controller::{SendOutcome, SessionController, SessionState, TurnNotice};
pub use display::{Applied, DisplayMessage, DisplayReconciler};
pub use history::ConversationHistory;
