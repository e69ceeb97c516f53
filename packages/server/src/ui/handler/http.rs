//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};

use crate::{
    domain::{Rejection, Username},
    infrastructure::dto::http::{
        ConnectionsDto, CreateMessageRequest, CredentialsRequest, ErrorResponse, LoginResponse,
        MessageRecordDto, StatusResponse,
    },
    ui::state::AppState,
    usecase::{LoginError, RegisterUserError, SendMessageError, SessionError},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// `Authorization: Bearer <token>` の token 部分
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Username, ApiError> {
    let token = bearer_token(headers).unwrap_or_default();
    state
        .identity_verifier
        .verify(token)
        .map_err(|rejection: Rejection| api_error(StatusCode::UNAUTHORIZED, rejection.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    match state
        .register_user_usecase
        .execute(body.username, body.password)
        .await
    {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(StatusResponse {
                message: "Account created".to_string(),
            }),
        )),
        Err(RegisterUserError::Repository(e)) => {
            tracing::error!("Failed to create account: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Account could not be created",
            ))
        }
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

/// Exchange credentials for an access token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.login_usecase.execute(body.username, body.password).await {
        Ok(outcome) => Ok(Json(LoginResponse {
            access_token: outcome.access_token,
            username: outcome.username.into_string(),
        })),
        Err(LoginError::InvalidCredentials) => Err(api_error(
            StatusCode::UNAUTHORIZED,
            LoginError::InvalidCredentials.to_string(),
        )),
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed"))
        }
    }
}

/// Full message history, oldest first
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageRecordDto>>, ApiError> {
    match state.get_messages_usecase.execute().await {
        Ok(records) => Ok(Json(records.iter().map(MessageRecordDto::from).collect())),
        Err(e) => {
            tracing::error!("Failed to load message history: {}", e);
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Messages could not be loaded",
            ))
        }
    }
}

/// Post a chat message over HTTP; it is persisted and broadcast like a websocket message
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageRecordDto>), ApiError> {
    let username = authenticate(&state, &headers)?;

    match state
        .send_message_usecase
        .execute(&username, body.content)
        .await
    {
        Ok(sent) => Ok((StatusCode::CREATED, Json(MessageRecordDto::from(&sent.record)))),
        Err(SendMessageError::EmptyContent) => Err(api_error(
            StatusCode::BAD_REQUEST,
            SessionError::EmptyContent.to_string(),
        )),
        Err(e @ (SendMessageError::Store(_) | SendMessageError::StoreTimedOut)) => {
            tracing::error!("Failed to persist message from '{}': {}", username, e);
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                SessionError::StoreUnavailable.to_string(),
            ))
        }
        Err(SendMessageError::Broadcast(e)) => {
            tracing::error!("Failed to broadcast message from '{}': {}", username, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Message saved but not delivered",
            ))
        }
    }
}

/// Debug endpoint listing the live connections
pub async fn debug_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionsDto> {
    let snapshot = state.get_connections_usecase.execute().await;
    Json(ConnectionsDto {
        count: snapshot.count,
        identities: snapshot
            .identities
            .into_iter()
            .map(Username::into_string)
            .collect(),
    })
}
