//! SQLite User Repository 実装

use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension};

use super::{DbPool, storage_error, with_connection};
use crate::domain::{RepositoryError, Timestamp, UserAccount, UserRepository, Username};

pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, account: UserAccount) -> Result<(), RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let result = conn.execute(
                "INSERT INTO users (username, password_hash, created_at_ms) VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    account.username.as_str(),
                    account.password_hash,
                    account.created_at.as_millis()
                ],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(RepositoryError::DuplicateUsername(
                        account.username.into_string(),
                    ))
                }
                Err(e) => Err(storage_error(e)),
            }
        })
        .await
    }

    async fn find_user(&self, username: &Username) -> Result<Option<UserAccount>, RepositoryError> {
        let username = username.clone();
        with_connection(&self.pool, move |conn| {
            let row = conn
                .query_row(
                    "SELECT password_hash, created_at_ms FROM users WHERE username = ?1",
                    [username.as_str()],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()
                .map_err(storage_error)?;

            row.map(|(password_hash, created_at_ms)| {
                let created_at = Timestamp::from_millis(created_at_ms).ok_or_else(|| {
                    RepositoryError::Corrupted(format!("user {}: timestamp out of range", username))
                })?;
                Ok(UserAccount::new(username.clone(), password_hash, created_at))
            })
            .transpose()
        })
        .await
    }
}
