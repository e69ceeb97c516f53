//! Realtime chat server.
//!
//! Run with:
//! ```not_rust
//! PARLOR_SECRET_KEY=change-me cargo run --bin parlor-server
//! cargo run --bin parlor-server -- --secret-key change-me --port 3000 --database ./parlor.db
//! ```

use std::sync::Arc;

use clap::Parser;
use parlor_server::{
    config::Config,
    domain::{MessageStore, UserRepository},
    infrastructure::{
        auth::{JwtIdentityService, Sha256PasswordHasher},
        repository::{
            InMemoryMessageStore, InMemoryUserRepository, SqliteMessageStore,
            SqliteUserRepository, sqlite,
        },
    },
    ui::{
        Server,
        state::{AppState, Collaborators},
    },
};
use parlor_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 1. Stores
    let (message_store, user_repository): (Arc<dyn MessageStore>, Arc<dyn UserRepository>) =
        match &config.database {
            Some(path) => {
                let pool = sqlite::open(path)?;
                tracing::info!("Using SQLite database at {}", path.display());
                (
                    Arc::new(
                        SqliteMessageStore::new(pool.clone(), clock.clone())
                            .with_lock_timeout(config.store_timeout()),
                    ),
                    Arc::new(SqliteUserRepository::new(pool)),
                )
            }
            None => {
                tracing::warn!("No database configured; messages and accounts live in memory");
                if config.store_timeout().is_some() {
                    tracing::warn!("Store timeout only applies to the SQLite store, ignoring");
                }
                (
                    Arc::new(InMemoryMessageStore::new(clock.clone())),
                    Arc::new(InMemoryUserRepository::new()),
                )
            }
        };

    // 2. Identity
    let jwt = Arc::new(JwtIdentityService::new(
        config.secret_key.as_bytes(),
        config.token_ttl(),
        clock.clone(),
    ));

    // 3. Application state and server
    let state = AppState::assemble(
        Collaborators {
            message_store,
            user_repository,
            identity_verifier: jwt.clone(),
            token_issuer: jwt,
            password_hasher: Arc::new(Sha256PasswordHasher::new()),
            clock,
        },
        config.outbound_buffer,
    );

    Server::new(state).run(config.host, config.port).await
}
