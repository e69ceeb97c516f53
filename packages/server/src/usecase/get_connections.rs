//! UseCase: 接続状況の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{MessagePusher, Username};

/// ある時点での接続数と、直近に確認できた識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionsSnapshot {
    pub count: usize,
    pub identities: Vec<Username>,
}

pub struct GetConnectionsUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetConnectionsUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self) -> ConnectionsSnapshot {
        ConnectionsSnapshot {
            count: self.message_pusher.connection_count().await,
            identities: self.message_pusher.connected_identities().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionId,
        infrastructure::{message_pusher::WebSocketMessagePusher, registry::ConnectionRegistry},
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_snapshot_counts_anonymous_connections() {
        // テスト項目: まだイベントを送っていない接続も数に含まれる
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        let (tx1, _rx1) = mpsc::channel(4);
        let (tx2, _rx2) = mpsc::channel(4);
        let alice_connection = ConnectionId::generate();
        registry.register(alice_connection, tx1).await;
        registry.register(ConnectionId::generate(), tx2).await;
        let alice = Username::new("alice".to_string()).unwrap();
        registry.note_identity(&alice_connection, &alice).await;
        let usecase = GetConnectionsUseCase::new(pusher);

        // when (操作):
        let snapshot = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(
            snapshot,
            ConnectionsSnapshot {
                count: 2,
                identities: vec![alice],
            }
        );
    }
}
