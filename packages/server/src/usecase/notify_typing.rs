//! UseCase: 入力中通知
//!
//! 永続化は行わず、送信者を含む全接続にブロードキャストする。

use std::sync::Arc;

use crate::domain::{BroadcastReport, MessagePushError, MessagePusher, ServerEvent, Username};

pub struct NotifyTypingUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, username: &Username) -> Result<BroadcastReport, MessagePushError> {
        let event = ServerEvent::Typing {
            username: username.clone(),
        };
        self.message_pusher.broadcast(&event).await
    }
}
