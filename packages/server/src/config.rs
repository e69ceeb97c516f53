//! Server configuration (command line flags with environment fallbacks).

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("secret key must not be empty (set --secret-key or PARLOR_SECRET_KEY)")]
    EmptySecretKey,

    #[error("outbound buffer must hold at least one event")]
    ZeroOutboundBuffer,

    #[error("token lifetime must be at least one hour")]
    ZeroTokenTtl,
}

/// Realtime chat server
#[derive(Parser, Debug, Clone)]
#[command(name = "parlor-server", version)]
#[command(about = "Realtime chat server with websocket broadcast", long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PARLOR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PARLOR_PORT", default_value = "8080")]
    pub port: u16,

    /// Secret used to sign and verify access tokens
    #[arg(long, env = "PARLOR_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// SQLite database file. Messages and accounts are kept in memory when omitted
    #[arg(long, env = "PARLOR_DATABASE")]
    pub database: Option<PathBuf>,

    /// Access token lifetime in hours
    #[arg(long, env = "PARLOR_TOKEN_TTL_HOURS", default_value = "12")]
    pub token_ttl_hours: u32,

    /// Number of outbound events buffered per connection before it is dropped as too slow
    #[arg(long, env = "PARLOR_OUTBOUND_BUFFER", default_value = "256")]
    pub outbound_buffer: usize,

    /// Give up on a message write when the database stays locked for this many milliseconds
    #[arg(long, env = "PARLOR_STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "PARLOR_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::ZeroOutboundBuffer);
        }
        if self.token_ttl_hours == 0 {
            return Err(ConfigError::ZeroTokenTtl);
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.token_ttl_hours))
    }

    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }
}
