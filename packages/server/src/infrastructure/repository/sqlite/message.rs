//! SQLite Message Store 実装

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parlor_shared::time::Clock;

use super::{DbPool, storage_error, with_connection, with_connection_within};
use crate::domain::{
    MessageContent, MessageId, MessageRecord, MessageStore, RepositoryError, Timestamp, Username,
};

pub struct SqliteMessageStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    /// 書き込み時に接続のロックを待つ上限。None なら無制限
    lock_timeout: Option<Duration>,
}

impl SqliteMessageStore {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            lock_timeout: None,
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Option<Duration>) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

fn row_to_record(
    id: i64,
    username: String,
    content: String,
    timestamp_ms: i64,
) -> Result<MessageRecord, RepositoryError> {
    let corrupted = |what: &str| RepositoryError::Corrupted(format!("message {}: {}", id, what));
    Ok(MessageRecord::new(
        MessageId::new(id),
        Username::new(username).map_err(|e| corrupted(&e.to_string()))?,
        MessageContent::new(content).map_err(|e| corrupted(&e.to_string()))?,
        Timestamp::from_millis(timestamp_ms).ok_or_else(|| corrupted("timestamp out of range"))?,
    ))
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn persist(
        &self,
        username: &Username,
        content: &MessageContent,
    ) -> Result<MessageRecord, RepositoryError> {
        let username = username.clone();
        let content = content.clone();
        let clock = self.clock.clone();

        with_connection_within(&self.pool, self.lock_timeout, move |conn| {
            // 時刻の取得もロック内で行い、ID 順と時刻順を揃える
            let timestamp = Timestamp::new(clock.now());
            conn.execute(
                "INSERT INTO messages (username, content, timestamp_ms) VALUES (?1, ?2, ?3)",
                rusqlite::params![username.as_str(), content.as_str(), timestamp.as_millis()],
            )
            .map_err(storage_error)?;
            let id = MessageId::new(conn.last_insert_rowid());
            Ok(MessageRecord::new(id, username, content, timestamp))
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<MessageRecord>, RepositoryError> {
        with_connection(&self.pool, |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, username, content, timestamp_ms FROM messages ORDER BY id ASC",
                )
                .map_err(storage_error)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(storage_error)?;

            let mut records = Vec::new();
            for row in rows {
                let (id, username, content, timestamp_ms) = row.map_err(storage_error)?;
                records.push(row_to_record(id, username, content, timestamp_ms)?);
            }
            Ok(records)
        })
        .await
    }
}
