//! UseCase layer
//!
//! アプリケーション固有のビジネスロジック。Domain 層の trait にのみ依存する。

pub mod error;
pub mod get_connections;
pub mod get_messages;
pub mod login;
pub mod notify_typing;
pub mod register_user;
pub mod send_message;
pub mod session;

pub use error::{
    GetMessagesError, LoginError, RegisterUserError, SendMessageError, SessionError,
};
pub use get_connections::{ConnectionsSnapshot, GetConnectionsUseCase};
pub use get_messages::GetMessagesUseCase;
pub use login::{LoginOutcome, LoginUseCase};
pub use notify_typing::NotifyTypingUseCase;
pub use register_user::RegisterUserUseCase;
pub use send_message::{SendMessageUseCase, SentMessage};
pub use session::{Session, SessionContext, SessionState};
