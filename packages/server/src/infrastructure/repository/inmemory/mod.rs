//! インメモリ Repository 実装

pub mod message;
pub mod user;

pub use message::InMemoryMessageStore;
pub use user::InMemoryUserRepository;
