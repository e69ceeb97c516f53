//! MessagePusher trait 定義
//!
//! 接続レジストリとブロードキャストエンジンのインターフェース。
//! UseCase 層はこの trait にのみ依存し、WebSocket の詳細には依存しない。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    event::ServerEvent,
    value_object::{ConnectionId, Username},
};

/// 接続ごとの送信バッファ（有界）の送信側
///
/// レジストリが唯一の長期保有者。レジストリから外れると受信側が閉じ、接続も閉じる。
pub type PusherChannel = mpsc::Sender<String>;

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 配信に成功した接続数
    pub delivered: usize,
    /// 配信に失敗し、レジストリから外された接続
    pub evicted: Vec<ConnectionId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除（存在しなければ何もしない）。実際に削除した場合 true
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    /// 診断用に、接続上で最後に検証されたユーザー名を記録
    async fn note_identity(&self, connection_id: &ConnectionId, username: &Username);

    /// 特定の接続にだけ送信（エラー応答用）
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 全接続に送信。失敗した接続は走査の完了後に登録解除される
    async fn broadcast(&self, event: &ServerEvent) -> Result<BroadcastReport, MessagePushError>;

    /// 接続数
    async fn connection_count(&self) -> usize;

    /// 診断用: 検証済みイベントを送ったことのある接続のユーザー名（ソート・重複除去済み）
    async fn connected_identities(&self) -> Vec<Username>;
}
