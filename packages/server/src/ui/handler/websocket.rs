//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::InboundEvent,
    infrastructure::dto::websocket::InboundEventDto,
    ui::state::AppState,
    usecase::{Session, SessionState},
};

/// How long the writer may keep flushing after the reader has finished
const CLOSE_GRACE: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drains the connection's outbound buffer into the socket.
///
/// The buffer closes when the registry drops the connection; whatever was queued before that
/// is still written, then a close frame ends the connection.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

/// Reads frames until the peer goes away, the session closes itself, or `shutdown` fires.
///
/// `shutdown` is only observed between frames, so an event that has started is always
/// handled to the end.
async fn receive_loop<S>(mut session: Session, mut receiver: S, shutdown: CancellationToken)
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = receiver.next() => frame,
        };
        let Some(frame) = frame else {
            break;
        };
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", session.id(), e);
                break;
            }
        };

        let state = match frame {
            Message::Text(text) => match serde_json::from_str::<InboundEventDto>(text.as_str()) {
                Ok(dto) => session.handle_event(InboundEvent::from(dto)).await,
                Err(e) => session.handle_malformed(&e.to_string()).await,
            },
            Message::Binary(_) => session.handle_malformed("binary frame").await,
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", session.id());
                break;
            }
            // ping/pong は axum が処理する
            _ => continue,
        };

        if state == SessionState::Closed {
            break;
        }
    }

    session.close().await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel(state.outbound_buffer);

    let context = state.session_context.clone();
    let mut session = Session::new(context.clone());
    let connection_id = session.id();
    session.accept(tx).await;

    let shutdown = CancellationToken::new();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = tokio::spawn(receive_loop(session, receiver, shutdown.clone()));

    tokio::select! {
        _ = &mut recv_task => {
            // 送信済みのエラーと close フレームを書き出す猶予
            if tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            // 書き込みに失敗した（相手が消えた）か、ブロードキャストで退去させられた。
            // 処理中のイベントは最後まで終わらせてから読み込みを止める
            shutdown.cancel();
            if let Err(e) = recv_task.await {
                tracing::error!("Reader for '{}' failed: {}", connection_id, e);
            }
            context.release(&connection_id).await;
        }
    };

    tracing::info!("Connection '{}' finished", connection_id);
}
