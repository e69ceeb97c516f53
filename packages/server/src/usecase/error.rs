//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{
    MessagePushError, Rejection, RepositoryError, TokenIssueError, ValueObjectError,
};

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message content is empty")]
    EmptyContent,

    #[error("message store failed: {0}")]
    Store(RepositoryError),

    /// ストアが時間内に書き込みを開始できなかった（何も保存されていない）
    #[error("message store did not accept the write in time")]
    StoreTimedOut,

    /// 永続化は完了しているが配信に失敗した
    #[error("broadcast failed: {0}")]
    Broadcast(#[from] MessagePushError),
}

impl From<RepositoryError> for SendMessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Busy => Self::StoreTimedOut,
            other => Self::Store(other),
        }
    }
}

/// 履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessagesError {
    #[error("message store failed: {0}")]
    Store(#[from] RepositoryError),
}

/// アカウント登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterUserError {
    #[error("Username and password are required")]
    MissingFields,

    #[error("{0}")]
    InvalidUsername(#[from] ValueObjectError),

    #[error("User already exists")]
    DuplicateUsername,

    #[error("user repository failed: {0}")]
    Repository(RepositoryError),
}

/// ログインのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("token issuance failed: {0}")]
    TokenIssue(#[from] TokenIssueError),

    #[error("user repository failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// セッション中に送信者へ返すエラー
///
/// `Display` の文字列がそのまま `{"error": ...}` としてクライアントに送られる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0}")]
    Rejected(Rejection),

    #[error("Empty message")]
    EmptyContent,

    #[error("Invalid payload")]
    MalformedPayload,

    #[error("Message could not be saved")]
    StoreUnavailable,
}
