//! UseCase: 接続ごとのセッション（状態機械）
//!
//! 状態: `Connecting → Active → Closed`（Closed は終端）
//!
//! - `Connecting → Active`: 接続を受け付け、レジストリに登録する
//! - `Active → Active`: イベントごとにトークンを検証し、種別に応じて処理する
//! - `Active → Closed`: トランスポートの切断、またはトークンが Invalid / Expired
//!
//! 認証はイベントごとに行い、接続にユーザー名を束縛しない。
//! 登録解除は冪等で、切断経路と明示的なクローズ経路が競合しても問題ない。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EventKind, IdentityVerifier, InboundEvent, MessagePusher, PusherChannel,
    Rejection, ServerEvent, Username,
};

use super::{
    error::{SendMessageError, SessionError},
    notify_typing::NotifyTypingUseCase,
    send_message::SendMessageUseCase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

/// 全セッションが共有する依存
pub struct SessionContext {
    identity_verifier: Arc<dyn IdentityVerifier>,
    message_pusher: Arc<dyn MessagePusher>,
    notify_typing_usecase: Arc<NotifyTypingUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
}

impl SessionContext {
    pub fn new(
        identity_verifier: Arc<dyn IdentityVerifier>,
        message_pusher: Arc<dyn MessagePusher>,
        notify_typing_usecase: Arc<NotifyTypingUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
    ) -> Self {
        Self {
            identity_verifier,
            message_pusher,
            notify_typing_usecase,
            send_message_usecase,
        }
    }

    /// 接続をレジストリから外す（冪等）
    pub async fn release(&self, connection_id: &ConnectionId) {
        if self.message_pusher.unregister_client(connection_id).await {
            tracing::info!("Connection '{}' removed from registry", connection_id);
        }
    }
}

/// 1 接続分のセッション
///
/// 接続そのもの（送信バッファ）はレジストリが所有し、セッションは ID だけを保持する。
pub struct Session {
    id: ConnectionId,
    state: SessionState,
    context: Arc<SessionContext>,
}

impl Session {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self {
            id: ConnectionId::generate(),
            state: SessionState::Connecting,
            context,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `Connecting → Active`
    pub async fn accept(&mut self, sender: PusherChannel) -> SessionState {
        if self.state != SessionState::Connecting {
            return self.state;
        }
        self.context
            .message_pusher
            .register_client(self.id, sender)
            .await;
        self.state = SessionState::Active;
        tracing::info!("Connection '{}' accepted", self.id);
        self.state
    }

    /// 受信イベントを 1 件処理し、処理後の状態を返す
    pub async fn handle_event(&mut self, event: InboundEvent) -> SessionState {
        if self.state != SessionState::Active {
            return self.state;
        }

        let token = event.token.as_deref().unwrap_or_default();
        let username = match self.context.identity_verifier.verify(token) {
            Ok(username) => username,
            Err(rejection) => return self.reject(rejection).await,
        };
        self.context
            .message_pusher
            .note_identity(&self.id, &username)
            .await;

        match event.kind {
            EventKind::Typing => self.typing(&username).await,
            EventKind::Message => self.message(&username, event.content).await,
            EventKind::Unknown(kind) => {
                tracing::debug!(
                    "Ignoring unknown event '{}' from '{}' on '{}'",
                    kind,
                    username,
                    self.id
                );
            }
        }

        self.state
    }

    /// JSON として解釈できないペイロード。送信者にだけエラーを返し、接続は維持する
    pub async fn handle_malformed(&mut self, reason: &str) -> SessionState {
        if self.state != SessionState::Active {
            return self.state;
        }
        tracing::warn!("Malformed payload on '{}': {}", self.id, reason);
        self.reply(SessionError::MalformedPayload).await;
        self.state
    }

    /// `Active → Closed`。終端状態では何もしない
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.context.release(&self.id).await;
    }

    async fn reject(&mut self, rejection: Rejection) -> SessionState {
        tracing::warn!("Rejected event on '{}': {}", self.id, rejection);
        self.reply(SessionError::Rejected(rejection)).await;
        if rejection.closes_connection() {
            self.close().await;
        }
        self.state
    }

    async fn typing(&self, username: &Username) {
        if let Err(e) = self.context.notify_typing_usecase.execute(username).await {
            tracing::warn!("Failed to broadcast typing for '{}': {}", username, e);
        }
    }

    async fn message(&self, username: &Username, content: Option<String>) {
        match self
            .context
            .send_message_usecase
            .execute(username, content)
            .await
        {
            Ok(sent) => {
                tracing::debug!(
                    "Message {} delivered to {} connection(s)",
                    sent.record.id.value(),
                    sent.report.delivered
                );
            }
            Err(SendMessageError::EmptyContent) => self.reply(SessionError::EmptyContent).await,
            Err(e @ (SendMessageError::Store(_) | SendMessageError::StoreTimedOut)) => {
                tracing::error!("Failed to persist message from '{}': {}", username, e);
                self.reply(SessionError::StoreUnavailable).await;
            }
            Err(SendMessageError::Broadcast(e)) => {
                tracing::error!("Failed to broadcast message from '{}': {}", username, e);
            }
        }
    }

    async fn reply(&self, error: SessionError) {
        let event = ServerEvent::error(error.to_string());
        if let Err(e) = self.context.message_pusher.push_to(&self.id, &event).await {
            tracing::warn!("Failed to reply to '{}': {}", self.id, e);
        }
    }
}
