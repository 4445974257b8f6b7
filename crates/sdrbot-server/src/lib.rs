//! HTTP API for the sdrbot lead-qualification flow.
//!
//! Routes mirror the original service surface (`/start_conversation`,
//! `/ask_question`, `/get_summary`) plus `/capture_lead`, which carries the
//! web form's intake logic without any UI rendering. The LLM gateway and the
//! session store are injected; handlers own no global state.

/// API error type and status mapping.
pub mod error;
/// Request handlers.
pub mod handlers;
/// Router assembly and the session-expiry sweep.
pub mod server;

pub use error::ApiError;
pub use server::{spawn_expiry_sweep, ApiServer, AppState};
