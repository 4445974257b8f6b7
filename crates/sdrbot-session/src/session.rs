use chrono::{DateTime, Utc};
use sdrbot_core::{Answer, Conversation, Role};
use serde::{Deserialize, Serialize};

/// State for one visitor's ongoing exchange.
///
/// Created on the first `start_conversation` call, looked up by id on every
/// subsequent call. A session that has produced a summary keeps serving
/// further calls; nothing locks it terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Caller-chosen continuity token.
    pub id: String,
    /// Full dialogue history, replayed into every context-bearing prompt.
    pub conversation: Conversation,
    /// Elicited question/answer pairs, one per field.
    pub answers: Vec<Answer>,
    /// The generated summary, once `get_summary` has succeeded.
    pub summary: Option<String>,
    /// UTC timestamp of session creation.
    pub created_at: DateTime<Utc>,
    /// UTC timestamp of the last mutation, drives idle expiry.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            conversation: Conversation::new(),
            answers: Vec::new(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message to the conversation.
    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.updated_at = Utc::now();
        self.conversation.push(role, content);
    }

    /// Records an elicited question/answer pair.
    pub fn record_answer(&mut self, answer: Answer) {
        self.updated_at = Utc::now();
        self.answers.push(answer);
    }

    /// Stores the generated summary.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.updated_at = Utc::now();
        self.summary = Some(summary.into());
    }

    /// Number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new("visitor-1");
        assert_eq!(session.id, "visitor-1");
        assert_eq!(session.message_count(), 0);
        assert!(session.answers.is_empty());
        assert!(session.summary.is_none());
    }

    #[test]
    fn test_mutations_advance_updated_at() {
        let mut session = Session::new("visitor-1");
        let before = session.updated_at;
        session.push_message(Role::Bot, "hello");
        assert!(session.updated_at >= before);
        assert_eq!(session.message_count(), 1);
    }
}
