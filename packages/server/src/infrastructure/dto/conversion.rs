//! Conversion logic between DTOs and domain types.

use crate::domain::{EventKind, InboundEvent, MessageRecord, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::InboundEventDto> for InboundEvent {
    fn from(dto: dto::InboundEventDto) -> Self {
        Self {
            kind: EventKind::parse(dto.event.as_deref()),
            token: dto.token,
            content: dto.content,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&MessageRecord> for http::MessageRecordDto {
    fn from(record: &MessageRecord) -> Self {
        Self {
            id: record.id.value(),
            username: record.username.as_str().to_string(),
            content: record.content.as_str().to_string(),
            timestamp: record.timestamp.to_wire(),
        }
    }
}

impl From<&MessageRecord> for dto::OutboundEventDto {
    fn from(record: &MessageRecord) -> Self {
        Self::Message {
            id: record.id.value(),
            username: record.username.as_str().to_string(),
            content: record.content.as_str().to_string(),
            timestamp: record.timestamp.to_wire(),
        }
    }
}

/// Serialize a server event into its wire JSON
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    match event {
        ServerEvent::Typing { username } => {
            serde_json::to_string(&dto::OutboundEventDto::Typing {
                username: username.as_str().to_string(),
            })
        }
        ServerEvent::Message(record) => {
            serde_json::to_string(&dto::OutboundEventDto::from(record))
        }
        ServerEvent::Error { message } => serde_json::to_string(&dto::ErrorEventDto {
            error: message.clone(),
        }),
    }
}
