//! Session registry for the sdrbot HTTP API.
//!
//! A session links multiple requests from one visitor into one ongoing
//! exchange. Storage sits behind the [`SessionStore`] trait and is injected
//! into handlers; the in-memory implementation is volatile by design (state
//! is lost on restart, no persistence layer exists). [`SessionLocks`]
//! provides per-session exclusion so overlapping requests against one id
//! cannot interleave their read-LLM-write sequences.

/// Keyed per-session async locks.
pub mod locks;
/// Session state.
pub mod session;
/// Storage trait and the in-memory implementation.
pub mod store;

pub use locks::SessionLocks;
pub use session::Session;
pub use store::{CreateOutcome, MemorySessionStore, SessionStore};
