//! Domain layer
//!
//! Value objects, entities, events and the collaborator traits the core depends on.
//! Concrete implementations live in the infrastructure layer (dependency inversion).

pub mod entity;
pub mod error;
pub mod event;
pub mod identity;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{MessageRecord, UserAccount};
pub use error::{MessagePushError, Rejection, RepositoryError, TokenIssueError, ValueObjectError};
pub use event::{EventKind, InboundEvent, ServerEvent};
pub use identity::{IdentityVerifier, PasswordHasher, TokenIssuer};
pub use message_pusher::{BroadcastReport, MessagePusher, PusherChannel};
pub use repository::{MessageStore, UserRepository};
pub use value_object::{ConnectionId, MessageContent, MessageId, Timestamp, Username};
