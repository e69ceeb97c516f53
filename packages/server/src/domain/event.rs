//! Events exchanged over a connection.

use super::{entity::MessageRecord, value_object::Username};

/// Kind of an inbound event, as announced by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Typing,
    Message,
    /// Anything else, including an absent `event` field (empty string)
    Unknown(String),
}

impl EventKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("typing") => EventKind::Typing,
            Some("message") => EventKind::Message,
            Some(other) => EventKind::Unknown(other.to_string()),
            None => EventKind::Unknown(String::new()),
        }
    }
}

/// An inbound event before identity verification.
///
/// The token travels with every event; identity is never bound to the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub kind: EventKind,
    pub token: Option<String>,
    pub content: Option<String>,
}

/// An outbound event pushed to one or all connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Typing { username: Username },
    Message(MessageRecord),
    /// Unicast error reply; never broadcast
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}
