//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{MessageRecord, MessageStore};

use super::error::GetMessagesError;

pub struct GetMessagesUseCase {
    message_store: Arc<dyn MessageStore>,
}

impl GetMessagesUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }

    /// 全メッセージを ID の昇順で返す
    pub async fn execute(&self) -> Result<Vec<MessageRecord>, GetMessagesError> {
        Ok(self.message_store.list_all().await?)
    }
}
