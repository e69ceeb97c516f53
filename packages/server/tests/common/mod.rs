//! In-process test server and websocket helpers shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use parlor_server::{
    domain::{TokenIssuer, Username},
    infrastructure::{
        auth::{JwtIdentityService, Sha256PasswordHasher},
        repository::{InMemoryMessageStore, InMemoryUserRepository},
    },
    ui::{
        Server,
        state::{AppState, Collaborators},
    },
};
use parlor_shared::time::{FixedClock, SystemClock};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const SECRET: &[u8] = b"integration-secret";
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Server bound to an ephemeral port, stopped when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    jwt: Arc<JwtIdentityService>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let clock = Arc::new(SystemClock);
        let jwt = Arc::new(JwtIdentityService::new(
            SECRET,
            chrono::Duration::hours(12),
            clock.clone(),
        ));
        let state = AppState::assemble(
            Collaborators {
                message_store: Arc::new(InMemoryMessageStore::new(clock.clone())),
                user_repository: Arc::new(InMemoryUserRepository::new()),
                identity_verifier: jwt.clone(),
                token_issuer: jwt.clone(),
                password_hasher: Arc::new(Sha256PasswordHasher::new()),
                clock,
            },
            64,
        );
        let router = Server::new(state).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, jwt, handle }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn token_for(&self, username: &str) -> String {
        self.jwt
            .issue(&Username::new(username.to_string()).unwrap())
            .unwrap()
    }

    /// 同じ秘密鍵で、発行時点ですでに期限切れのトークン
    pub fn expired_token_for(&self, username: &str) -> String {
        let past = JwtIdentityService::new(
            SECRET,
            chrono::Duration::hours(1),
            Arc::new(FixedClock::from_millis(0)),
        );
        past.issue(&Username::new(username.to_string()).unwrap())
            .unwrap()
    }

    pub async fn connect(&self) -> Client {
        let (client, _) = connect_async(self.ws_url()).await.unwrap();
        client
    }

    pub async fn connection_count(&self) -> u64 {
        let body: Value = reqwest::get(self.http_url("/debug/connections"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["count"].as_u64().unwrap()
    }

    /// 接続の登録はアップグレード後に非同期で行われるので、数が揃うまで待つ
    pub async fn wait_for_connections(&self, expected: u64) {
        for _ in 0..100 {
            if self.connection_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {} connections", expected);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .unwrap();
}

pub async fn send_raw(client: &mut Client, text: &str) {
    client.send(Message::text(text.to_string())).await.unwrap();
}

/// 次のテキストフレームを JSON として受け取る
pub async fn recv_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection ended")
            .expect("websocket error");
        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

/// サーバー側から接続が閉じられることを確認する
pub async fn expect_closed(client: &mut Client) {
    let next = tokio::time::timeout(RECV_TIMEOUT, client.next())
        .await
        .expect("timed out waiting for close");
    match next {
        None | Some(Err(_)) | Some(Ok(Message::Close(_))) => {}
        Some(Ok(frame)) => panic!("expected close, got {:?}", frame),
    }
}

/// 何も届かないことを確認する
pub async fn expect_silence(client: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(next.is_err(), "expected no frame, got {:?}", next);
}
