//! Repository implementations.
//!
//! - `inmemory`: process-local stores, used when no database path is configured
//! - `sqlite`: durable stores backed by a single SQLite file

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryMessageStore, InMemoryUserRepository};
pub use sqlite::{SqliteMessageStore, SqliteUserRepository};
