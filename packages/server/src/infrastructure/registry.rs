//! 接続レジストリ
//!
//! 現在開いている接続の集合。全ての変更とスナップショット取得は単一の
//! `tokio::sync::Mutex` の下で行われ、ソケットへの書き込み中にロックを保持することはない。
//!
//! レジストリが保持する `PusherChannel` が接続の送信バッファへの唯一の長期的な参照。
//! 登録解除でこれを drop すると、その接続の送信タスクが終了し接続が閉じる。

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PusherChannel, Username};

struct ConnectionEntry {
    sender: PusherChannel,
    /// 診断用ラベル。認可には使わない
    last_identity: Option<Username>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(
            connection_id,
            ConnectionEntry {
                sender,
                last_identity: None,
            },
        );
    }

    /// 存在しない接続の登録解除はエラーにならない（冪等）
    pub async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id).is_some()
    }

    /// 現時点のメンバーのコピー。並行する register / unregister の影響を受けない
    pub async fn snapshot(&self) -> Vec<(ConnectionId, PusherChannel)> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect()
    }

    pub async fn sender_of(&self, connection_id: &ConnectionId) -> Option<PusherChannel> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .map(|entry| entry.sender.clone())
    }

    pub async fn note_identity(&self, connection_id: &ConnectionId, username: &Username) {
        let mut connections = self.connections.lock().await;
        if let Some(entry) = connections.get_mut(connection_id) {
            entry.last_identity = Some(username.clone());
        }
    }

    /// ソート・重複除去済みのユーザー名
    pub async fn identities(&self) -> Vec<Username> {
        let connections = self.connections.lock().await;
        let mut identities: Vec<Username> = connections
            .values()
            .filter_map(|entry| entry.last_identity.clone())
            .collect();
        identities.sort();
        identities.dedup();
        identities
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }
}
