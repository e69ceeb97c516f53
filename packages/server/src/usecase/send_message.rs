//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 空メッセージの拒否、永続化、ストア採番値でのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 空メッセージは永続化もブロードキャストもされてはならない
//! - ブロードキャストにはクライアントの値ではなくストアが採番した ID / 時刻を使う
//! - ストアの失敗・タイムアウト時にブロードキャストしないことを保証
//! - タイムアウトで送信者に失敗を返したメッセージが、後から履歴に現れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：永続化してから全接続にブロードキャスト
//! - 異常系：空メッセージ、ストアの失敗、ストアのタイムアウト

use std::sync::Arc;

use crate::domain::{
    BroadcastReport, MessageContent, MessagePusher, MessageRecord, MessageStore, ServerEvent,
    Username,
};

use super::error::SendMessageError;

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub record: MessageRecord,
    pub report: BroadcastReport,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessageStore（永続化の抽象化）
    message_store: Arc<dyn MessageStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(
        message_store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            message_store,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `username` - 検証済みの送信者
    /// * `content` - クライアントが送った本文（欠損・空はエラー）
    ///
    /// # Returns
    ///
    /// * `Ok(SentMessage)` - 永続化されたレコードと配信結果
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        username: &Username,
        content: Option<String>,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. 本文の検証
        let content = MessageContent::new(content.unwrap_or_default())
            .map_err(|_| SendMessageError::EmptyContent)?;

        // 2. 永続化（ID と時刻はストアが採番）
        // 途中で打ち切ると書き込みだけが残りうるので、待ち時間の上限はストア側に任せる
        let record = self.message_store.persist(username, &content).await?;
        tracing::info!(
            "Message {} from '{}' persisted",
            record.id.value(),
            record.username
        );

        // 3. 送信者を含む全接続にブロードキャスト
        let report = self
            .message_pusher
            .broadcast(&ServerEvent::Message(record.clone()))
            .await?;

        Ok(SentMessage { record, report })
    }
}
