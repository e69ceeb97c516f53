//! Request handlers.

mod http;
mod websocket;

pub use http::{create_message, debug_connections, health_check, list_messages, login, register};
pub use websocket::websocket_handler;
