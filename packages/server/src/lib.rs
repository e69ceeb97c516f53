//! Realtime chat server library.
//!
//! Authenticated clients exchange typing notifications and persisted chat messages over
//! websockets; every accepted event is fanned out to all live connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
