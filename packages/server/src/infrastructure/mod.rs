//! Infrastructure layer
//!
//! Concrete implementations of the domain traits: JWT verification, password hashing,
//! the connection registry with its WebSocket broadcast engine, and message/user stores.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
