//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{MessageRecord, UserAccount},
    error::RepositoryError,
    value_object::{MessageContent, Username},
};

/// Message Store trait
///
/// ID の採番はストアだけが行う。複数のセッションから同時に呼ばれても、
/// 採番順と永続化の受付順が一致しなければならない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを永続化し、採番済みのレコードを返す
    async fn persist(
        &self,
        username: &Username,
        content: &MessageContent,
    ) -> Result<MessageRecord, RepositoryError>;

    /// 全メッセージを ID の昇順で取得
    async fn list_all(&self) -> Result<Vec<MessageRecord>, RepositoryError>;
}

/// User Repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// アカウントを作成（ユーザー名が重複していればエラー）
    async fn create_user(&self, account: UserAccount) -> Result<(), RepositoryError>;

    /// ユーザー名でアカウントを検索
    async fn find_user(&self, username: &Username) -> Result<Option<UserAccount>, RepositoryError>;
}
