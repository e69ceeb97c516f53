//! Shared application state.

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::{
    domain::{
        IdentityVerifier, MessagePusher, MessageStore, PasswordHasher, TokenIssuer, UserRepository,
    },
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::ConnectionRegistry},
    usecase::{
        GetConnectionsUseCase, GetMessagesUseCase, LoginUseCase, NotifyTypingUseCase,
        RegisterUserUseCase, SendMessageUseCase, SessionContext,
    },
};

pub struct AppState {
    /// 全セッションが共有する依存（検証・配信・送信）
    pub session_context: Arc<SessionContext>,
    /// HTTP の Bearer トークン検証にも同じ検証器を使う
    pub identity_verifier: Arc<dyn IdentityVerifier>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    pub login_usecase: Arc<LoginUseCase>,
    pub get_connections_usecase: Arc<GetConnectionsUseCase>,
    /// 接続ごとの送信バッファの容量
    pub outbound_buffer: usize,
}

/// 外部協調者（ストア・認証）一式
pub struct Collaborators {
    pub message_store: Arc<dyn MessageStore>,
    pub user_repository: Arc<dyn UserRepository>,
    pub identity_verifier: Arc<dyn IdentityVerifier>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// 依存関係を組み立てる
    ///
    /// 1. ConnectionRegistry / MessagePusher
    /// 2. UseCases
    /// 3. SessionContext
    pub fn assemble(
        collaborators: Collaborators,
        outbound_buffer: usize,
    ) -> Self {
        let Collaborators {
            message_store,
            user_repository,
            identity_verifier,
            token_issuer,
            password_hasher,
            clock,
        } = collaborators;

        // 1. 接続レジストリとブロードキャスト
        let registry = Arc::new(ConnectionRegistry::new());
        let message_pusher: Arc<dyn MessagePusher> =
            Arc::new(WebSocketMessagePusher::new(registry));

        // 2. UseCases
        let notify_typing_usecase = Arc::new(NotifyTypingUseCase::new(message_pusher.clone()));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            message_store.clone(),
            message_pusher.clone(),
        ));
        let get_messages_usecase = Arc::new(GetMessagesUseCase::new(message_store));
        let register_user_usecase = Arc::new(RegisterUserUseCase::new(
            user_repository.clone(),
            password_hasher.clone(),
            clock,
        ));
        let login_usecase = Arc::new(LoginUseCase::new(
            user_repository,
            password_hasher,
            token_issuer,
        ));
        let get_connections_usecase =
            Arc::new(GetConnectionsUseCase::new(message_pusher.clone()));

        // 3. セッション共有の依存
        let session_context = Arc::new(SessionContext::new(
            identity_verifier.clone(),
            message_pusher,
            notify_typing_usecase,
            send_message_usecase.clone(),
        ));

        Self {
            session_context,
            identity_verifier,
            send_message_usecase,
            get_messages_usecase,
            register_user_usecase,
            login_usecase,
            get_connections_usecase,
            outbound_buffer,
        }
    }
}
