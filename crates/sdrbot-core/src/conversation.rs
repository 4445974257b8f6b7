use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of the participant that authored a [`Message`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The qualification bot.
    Bot,
    /// The visitor being qualified.
    User,
}

impl Role {
    /// Speaker label used when rendering a transcript into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Role::Bot => "Bot",
            Role::User => "Visitor",
        }
    }
}

/// A single message exchanged within a qualification dialogue.
///
/// Messages are immutable once appended to a [`Conversation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// The textual content of the message.
    pub content: String,
    /// UTC timestamp of when the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a new message with [`Role::Bot`].
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Ordered history of exchanged messages.
///
/// The LLM provider has no memory of its own, so every prompt that needs
/// context embeds [`Conversation::render`] output — the full history, in
/// arrival order, re-transmitted on each call. The history is unbounded: no
/// dedup, no eviction, no truncation against provider input limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. O(1), never fails, never truncates.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Number of messages appended so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no message has been appended.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Renders the full transcript for embedding into a prompt.
    ///
    /// One line per message, in arrival order, each message exactly once:
    ///
    /// ```text
    /// Bot: Welcome!
    /// Visitor: Hi, I'm Ada.
    /// ```
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
