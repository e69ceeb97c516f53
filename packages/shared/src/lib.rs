//! Shared utilities for Parlor packages.

pub mod logger;
pub mod time;
