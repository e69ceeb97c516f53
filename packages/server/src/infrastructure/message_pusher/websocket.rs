//! WebSocket を使った MessagePusher 実装（ブロードキャストエンジン）
//!
//! ## 責務
//!
//! - `ConnectionRegistry` への登録・登録解除
//! - クライアントへのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層（`ui/handler/websocket.rs`）の送信タスクが行う。
//! ここでは各接続の有界バッファに `try_send` するだけなので、遅い接続が他の接続への
//! 配信を止めることはない。バッファが満杯または閉じている接続は配信失敗として扱い、
//! 走査の完了後にレジストリから外す。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;

use crate::{
    domain::{
        BroadcastReport, ConnectionId, MessagePushError, MessagePusher, PusherChannel,
        ServerEvent, Username,
    },
    infrastructure::{dto::conversion::encode_server_event, registry::ConnectionRegistry},
};

pub struct WebSocketMessagePusher {
    registry: Arc<ConnectionRegistry>,
}

impl WebSocketMessagePusher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        encode_server_event(event).map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

fn describe_failure(error: &TrySendError<String>) -> &'static str {
    match error {
        TrySendError::Full(_) => "outbound buffer full",
        TrySendError::Closed(_) => "connection closed",
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.registry.register(connection_id, sender).await;
        tracing::debug!("Connection '{}' registered", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.registry.unregister(connection_id).await;
        if removed {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
        removed
    }

    async fn note_identity(&self, connection_id: &ConnectionId, username: &Username) {
        self.registry.note_identity(connection_id, username).await;
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let payload = Self::encode(event)?;

        let Some(sender) = self.registry.sender_of(connection_id).await else {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        };

        if let Err(e) = sender.try_send(payload) {
            let reason = describe_failure(&e);
            tracing::warn!(
                "Failed to push to connection '{}': {}, evicting",
                connection_id,
                reason
            );
            drop(sender);
            self.registry.unregister(connection_id).await;
            return Err(MessagePushError::PushFailed(reason.to_string()));
        }

        tracing::debug!("Pushed event to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, event: &ServerEvent) -> Result<BroadcastReport, MessagePushError> {
        let payload = Self::encode(event)?;
        let targets = self.registry.snapshot().await;

        let mut report = BroadcastReport::default();
        for (connection_id, sender) in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match sender.try_send(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver to connection '{}': {}",
                        connection_id,
                        describe_failure(&e)
                    );
                    report.evicted.push(connection_id);
                }
            }
        }

        for connection_id in &report.evicted {
            self.registry.unregister(connection_id).await;
        }

        tracing::debug!(
            "Broadcast delivered to {} connection(s), evicted {}",
            report.delivered,
            report.evicted.len()
        );
        Ok(report)
    }

    async fn connection_count(&self) -> usize {
        self.registry.len().await
    }

    async fn connected_identities(&self) -> Vec<Username> {
        self.registry.identities().await
    }
}
