//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! Vec をインメモリ DB として使用します。採番と追加は同じロックの下で行うため、
//! ID の順序は永続化の受付順と一致します。

use std::sync::Arc;

use async_trait::async_trait;
use parlor_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    MessageContent, MessageId, MessageRecord, MessageStore, RepositoryError, Timestamp, Username,
};

struct MessageLog {
    records: Vec<MessageRecord>,
    next_id: i64,
}

pub struct InMemoryMessageStore {
    log: Mutex<MessageLog>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Mutex::new(MessageLog {
                records: Vec::new(),
                next_id: 1,
            }),
            clock,
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn persist(
        &self,
        username: &Username,
        content: &MessageContent,
    ) -> Result<MessageRecord, RepositoryError> {
        let mut log = self.log.lock().await;
        let record = MessageRecord::new(
            MessageId::new(log.next_id),
            username.clone(),
            content.clone(),
            Timestamp::new(self.clock.now()),
        );
        log.next_id += 1;
        log.records.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<MessageRecord>, RepositoryError> {
        let log = self.log.lock().await;
        Ok(log.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_shared::time::FixedClock;

    fn create_test_store() -> InMemoryMessageStore {
        InMemoryMessageStore::new(Arc::new(FixedClock::from_millis(1_714_564_800_000)))
    }

    fn username(value: &str) -> Username {
        Username::new(value.to_string()).unwrap()
    }

    fn content(value: &str) -> MessageContent {
        MessageContent::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_persist_assigns_id_and_timestamp() {
        // テスト項目: ストアが ID とタイムスタンプを採番する
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let record = store.persist(&username("bob"), &content("hi")).await.unwrap();

        // then (期待する結果):
        assert_eq!(record.id, MessageId::new(1));
        assert_eq!(record.username, username("bob"));
        assert_eq!(record.content, content("hi"));
        assert_eq!(record.timestamp.to_wire(), "2024-05-01T12:00:00Z");
    }

    #[tokio::test]
    async fn test_list_all_returns_ascending_ids() {
        // テスト項目: 一覧は ID の昇順で返される
        // given (前提条件):
        let store = create_test_store();
        for text in ["one", "two", "three"] {
            store.persist(&username("alice"), &content(text)).await.unwrap();
        }

        // when (操作):
        let records = store.list_all().await.unwrap();

        // then (期待する結果):
        let ids: Vec<i64> = records.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[2].content, content("three"));
    }

    #[tokio::test]
    async fn test_concurrent_persist_yields_unique_increasing_ids() {
        // テスト項目: 並行して永続化しても ID は重複せず、一覧の順序は ID 順
        // given (前提条件):
        let store = Arc::new(create_test_store());

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .persist(&username("alice"), &content(&format!("m{}", i)))
                    .await
                    .unwrap()
                    .id
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.value())
            .collect();
        assert_eq!(ids, (1..=20).collect::<Vec<i64>>());
    }
}
