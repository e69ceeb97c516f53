//! End-to-end websocket behaviour against an in-process server.

mod common;

use common::{TestServer, expect_closed, expect_silence, recv_json, send_json, send_raw};
use serde_json::json;

#[tokio::test]
async fn test_typing_and_message_reach_every_connection() {
    // テスト項目: alice の typing と bob のメッセージが送信者を含む全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;
    let alice_token = server.token_for("alice");
    let bob_token = server.token_for("bob");

    // when (操作):
    send_json(&mut alice, json!({"event": "typing", "token": alice_token})).await;
    let alice_typing = recv_json(&mut alice).await;
    let bob_typing = recv_json(&mut bob).await;
    send_json(
        &mut bob,
        json!({"event": "message", "token": bob_token, "content": "hi"}),
    )
    .await;
    let alice_message = recv_json(&mut alice).await;
    let bob_message = recv_json(&mut bob).await;

    // then (期待する結果):
    let typing = json!({"event": "typing", "username": "alice"});
    assert_eq!(alice_typing, typing);
    assert_eq!(bob_typing, typing);
    assert_eq!(alice_message, bob_message);
    assert_eq!(alice_message["event"], "message");
    assert_eq!(alice_message["id"], 1);
    assert_eq!(alice_message["username"], "bob");
    assert_eq!(alice_message["content"], "hi");
    let timestamp = alice_message["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), "2024-05-01T12:00:00Z".len());
    assert!(timestamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_ids_follow_acceptance_order() {
    // テスト項目: 連続したメッセージの ID は受付順に増加する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    server.wait_for_connections(1).await;
    let token = server.token_for("alice");

    // when (操作):
    let mut ids = Vec::new();
    for content in ["one", "two", "three"] {
        send_json(
            &mut alice,
            json!({"event": "message", "token": token, "content": content}),
        )
        .await;
        ids.push(recv_json(&mut alice).await["id"].as_i64().unwrap());
    }

    // then (期待する結果):
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_missing_token_keeps_connection_open() {
    // テスト項目: トークンなしのイベントは拒否されるが、接続は続く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    send_json(&mut alice, json!({"event": "message", "content": "hi"})).await;
    let rejection = recv_json(&mut alice).await;
    send_json(
        &mut alice,
        json!({"event": "message", "token": server.token_for("alice"), "content": "hi"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(rejection, json!({"error": "Token required"}));
    assert_eq!(recv_json(&mut alice).await["id"], 1);
    // bob にはエラーは届かず、正しいメッセージだけが届く
    assert_eq!(recv_json(&mut bob).await["content"], "hi");
    assert_eq!(server.connection_count().await, 2);
}

#[tokio::test]
async fn test_invalid_token_closes_only_that_connection() {
    // テスト項目: 不正なトークンは送信者の接続だけを閉じ、何も配信しない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut mallory = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    send_json(
        &mut mallory,
        json!({"event": "message", "token": "not-a-jwt", "content": "hi"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv_json(&mut mallory).await, json!({"error": "Invalid token"}));
    expect_closed(&mut mallory).await;
    expect_silence(&mut bob).await;
    server.wait_for_connections(1).await;
}

#[tokio::test]
async fn test_expired_token_closes_connection() {
    // テスト項目: 期限切れのトークンは接続を閉じる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    send_json(
        &mut alice,
        json!({"event": "typing", "token": server.expired_token_for("alice")}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv_json(&mut alice).await, json!({"error": "Token expired"}));
    expect_closed(&mut alice).await;
    server.wait_for_connections(0).await;
}

#[tokio::test]
async fn test_empty_message_is_rejected_without_broadcast() {
    // テスト項目: 空メッセージは送信者にだけエラーを返す
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    send_json(
        &mut alice,
        json!({"event": "message", "token": server.token_for("alice"), "content": ""}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv_json(&mut alice).await, json!({"error": "Empty message"}));
    expect_silence(&mut alice).await;
    expect_silence(&mut bob).await;
}

#[tokio::test]
async fn test_malformed_payload_keeps_connection_open() {
    // テスト項目: JSON でないペイロードにはエラーを返し、接続を維持する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    server.wait_for_connections(1).await;

    // when (操作):
    send_raw(&mut alice, "this is not json").await;
    let error = recv_json(&mut alice).await;
    send_json(
        &mut alice,
        json!({"event": "typing", "token": server.token_for("alice")}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(error, json!({"error": "Invalid payload"}));
    assert_eq!(
        recv_json(&mut alice).await,
        json!({"event": "typing", "username": "alice"})
    );
}

#[tokio::test]
async fn test_disconnect_unregisters_connection() {
    // テスト項目: クライアントが切断すると登録が外れ、残りの接続には配信が続く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = server.connect().await;
    let mut bob = server.connect().await;
    server.wait_for_connections(2).await;

    // when (操作):
    drop(alice);
    server.wait_for_connections(1).await;
    send_json(
        &mut bob,
        json!({"event": "typing", "token": server.token_for("bob")}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut bob).await,
        json!({"event": "typing", "username": "bob"})
    );
}
