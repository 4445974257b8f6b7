//! Core types and error definitions for the sdrbot lead-qualification bot.
//!
//! This crate provides the foundational types shared across all sdrbot crates:
//!
//! - [`SdrbotError`] — Unified error enum for all sdrbot subsystems.
//! - [`SdrbotResult`] — Convenience alias for `Result<T, SdrbotError>`.
//! - [`Role`] / [`Message`] — A single entry in a qualification dialogue.
//! - [`Conversation`] — Ordered message history replayed into LLM prompts.
//! - [`LeadFields`] / [`LeadRecord`] — Collected visitor data and the
//!   structured lead object emitted at the end of an intake flow.

/// Conversation history types.
pub mod conversation;
/// Lead record assembly and model-output parsing.
pub mod lead;

pub use conversation::{Conversation, Message, Role};
pub use lead::{Answer, LeadFields, LeadRecord, NOT_PROVIDED};

/// Top-level error type for the sdrbot crates.
///
/// Each variant corresponds to a subsystem that can produce errors. All entry
/// points (HTTP server and CLI) share this one taxonomy instead of improvising
/// their own response to the same underlying failure kind.
#[derive(Debug, thiserror::Error)]
pub enum SdrbotError {
    /// The outbound LLM request failed: transport error, non-success status,
    /// or a response body missing the completion text.
    #[error("LLM request failed: {0}")]
    Llm(String),

    /// An error related to session storage or bookkeeping.
    #[error("Session error: {0}")]
    Session(String),

    /// A lookup against a session id that does not exist.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`SdrbotError`].
pub type SdrbotResult<T> = Result<T, SdrbotError>;
