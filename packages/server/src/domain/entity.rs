//! Domain entities.

use super::value_object::{MessageContent, MessageId, Timestamp, Username};

/// A persisted chat message.
///
/// Only a `MessageStore` creates these; `id` and `timestamp` are assigned at persistence time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub username: Username,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl MessageRecord {
    pub fn new(
        id: MessageId,
        username: Username,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            content,
            timestamp,
        }
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: Username,
    /// Salted password digest, never the plaintext
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl UserAccount {
    pub fn new(username: Username, password_hash: String, created_at: Timestamp) -> Self {
        Self {
            username,
            password_hash,
            created_at,
        }
    }
}
