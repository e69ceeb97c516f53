//! SQLite Repository 実装
//!
//! rusqlite は同期 API のため、接続を `Arc<tokio::sync::Mutex<Connection>>` で共有する。
//! ロックは非同期に取得し、取得後の操作だけを `tokio::task::spawn_blocking` 上で実行する。
//! ロックは FIFO で書き込みを直列化するので、AUTOINCREMENT による採番順は永続化の受付順と一致する。
//!
//! 待ち時間の上限はロックの取得にだけ掛かる。ロックを取れた操作は必ず最後まで実行され、
//! 呼び出し側に結果が返る。

pub mod message;
pub mod user;

use std::{path::Path, sync::Arc, time::Duration};

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::RepositoryError;

pub use message::SqliteMessageStore;
pub use user::SqliteUserRepository;

/// Shared database connection
pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    username     TEXT    NOT NULL,
    content      TEXT    NOT NULL,
    timestamp_ms INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS users (
    username      TEXT    PRIMARY KEY,
    password_hash TEXT    NOT NULL,
    created_at_ms INTEGER NOT NULL
);
";

/// Open (or create) the database file and apply the schema
pub fn open(path: &Path) -> Result<DbPool, RepositoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RepositoryError::Storage(e.to_string()))?;
    }
    let conn = Connection::open(path).map_err(storage_error)?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(storage_error)?;
    initialize(conn)
}

/// In-memory database, mainly for tests
pub fn open_in_memory() -> Result<DbPool, RepositoryError> {
    initialize(Connection::open_in_memory().map_err(storage_error)?)
}

fn initialize(conn: Connection) -> Result<DbPool, RepositoryError> {
    conn.execute_batch(SCHEMA).map_err(storage_error)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn storage_error(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

/// Run `f` against the shared connection on the blocking thread pool
pub(crate) async fn with_connection<T, F>(pool: &DbPool, f: F) -> Result<T, RepositoryError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
{
    with_connection_within(pool, None, f).await
}

/// Like `with_connection`, but gives up with `RepositoryError::Busy` when the connection
/// cannot be locked within `lock_timeout`. Nothing has been written in that case.
pub(crate) async fn with_connection_within<T, F>(
    pool: &DbPool,
    lock_timeout: Option<Duration>,
    f: F,
) -> Result<T, RepositoryError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
{
    let guard = match lock_timeout {
        Some(limit) => tokio::time::timeout(limit, pool.clone().lock_owned())
            .await
            .map_err(|_| RepositoryError::Busy)?,
        None => pool.clone().lock_owned().await,
    };
    tokio::task::spawn_blocking(move || f(&guard))
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?
}
