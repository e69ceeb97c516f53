//! WebSocket event DTOs.

use serde::{Deserialize, Serialize};

/// Inbound event sent by a client.
///
/// Every field is optional on the wire; missing pieces are handled by the session state machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundEventDto {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Outbound success event, tagged by `event`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum OutboundEventDto {
    Typing {
        username: String,
    },
    Message {
        id: i64,
        username: String,
        content: String,
        timestamp: String,
    },
}

/// Outbound error, unicast to the sender only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEventDto {
    pub error: String,
}
