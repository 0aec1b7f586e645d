//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the loop:
//! the user sends a message → the loop calls the model → tool feedback
//! is appended → the transcript grows, strictly append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
///
/// Tool results are reported back as `User` messages carrying an
/// `Action_Response:` prefix — the text protocol has no separate tool role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user (and synthetic tool feedback)
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (protocol + tool descriptions)
    System,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::System,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Default turn budget per user message — the circuit breaker against
/// a model that keeps emitting actions forever.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// A conversation is an ordered, append-only sequence of messages plus the
/// loop's turn accounting. One per user-facing chat session; the host keeps
/// it alive between turns, the agent loop is the only writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// Tool round-trips consumed so far. Incremented once per tool result,
    /// never reset — the budget spans the whole session.
    pub turn_count: u32,

    /// Upper bound on tool round-trips (and thus model calls per message).
    pub max_turns: u32,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation with the default turn budget.
    pub fn new() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }

    /// Create a new empty conversation with an explicit turn budget.
    pub fn with_max_turns(max_turns: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            turn_count: 0,
            max_turns,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Whether the turn budget still allows another tool round-trip.
    pub fn has_budget(&self) -> bool {
        self.turn_count < self.max_turns
    }

    /// Get the total token count estimate (rough: 4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, agent!");
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new();
        let created = conv.created_at;

        conv.push(Message::user("First message"));
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.updated_at >= created);
    }

    #[test]
    fn fresh_conversation_has_full_budget() {
        let conv = Conversation::with_max_turns(3);
        assert_eq!(conv.turn_count, 0);
        assert_eq!(conv.max_turns, 3);
        assert!(conv.has_budget());
    }

    #[test]
    fn budget_exhausts_at_max_turns() {
        let mut conv = Conversation::with_max_turns(2);
        conv.turn_count = 2;
        assert!(!conv.has_budget());
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
    }

    #[test]
    fn conversation_token_estimate() {
        let mut conv = Conversation::new();
        // 20 chars ≈ 5 tokens
        conv.push(Message::user("12345678901234567890"));
        assert_eq!(conv.estimated_tokens(), 5);
    }
}
