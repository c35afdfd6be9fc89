//! Session registry scenarios: supersede, idempotent leave, eviction.

use chess_core::GameId;
use chess_protocol::ServerMessage;
use chess_server::registry::SessionRegistry;
use chess_server::types::{ConnId, OutboundRx, OutboundTx};

use tokio::sync::mpsc;

fn channel() -> (OutboundTx, OutboundRx) {
    mpsc::unbounded_channel::<ServerMessage>()
}

#[tokio::test]
async fn join_then_snapshot_contains_the_connection() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = channel();

    assert!(registry.join(GameId(1), "alice", ConnId(1), tx).await);

    let conns = registry.connections_for(GameId(1)).await;
    assert_eq!(conns.len(), 1);
    assert_eq!(conns[0].0, ConnId(1));
    assert_eq!(registry.username_of(ConnId(1)).await.as_deref(), Some("alice"));
}

#[tokio::test]
async fn unknown_game_snapshot_is_empty() {
    let registry = SessionRegistry::new();
    assert!(registry.connections_for(GameId(42)).await.is_empty());
}

#[tokio::test]
async fn same_username_supersedes_the_older_connection() {
    let registry = SessionRegistry::new();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    assert!(registry.join(GameId(1), "alice", ConnId(1), tx1).await);
    assert!(registry.join(GameId(1), "alice", ConnId(2), tx2).await);

    let conns = registry.connections_for(GameId(1)).await;
    assert_eq!(conns.len(), 1, "exactly one live connection per username");
    assert_eq!(conns[0].0, ConnId(2));
    assert_eq!(registry.username_of(ConnId(1)).await, None);
}

#[tokio::test]
async fn supersede_evicts_across_games() {
    let registry = SessionRegistry::new();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    assert!(registry.join(GameId(1), "alice", ConnId(1), tx1).await);
    assert!(registry.join(GameId(2), "alice", ConnId(2), tx2).await);

    assert!(registry.connections_for(GameId(1)).await.is_empty());
    assert_eq!(registry.connections_for(GameId(2)).await.len(), 1);
}

#[tokio::test]
async fn one_connection_cannot_register_as_two_usernames() {
    let registry = SessionRegistry::new();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    assert!(registry.join(GameId(1), "alice", ConnId(1), tx1).await);
    assert!(!registry.join(GameId(1), "bob", ConnId(1), tx2).await);
}

#[tokio::test]
async fn leave_is_idempotent() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = channel();

    registry.join(GameId(1), "alice", ConnId(1), tx).await;

    assert!(registry.leave(GameId(1), ConnId(1)).await);
    assert!(!registry.leave(GameId(1), ConnId(1)).await, "second leave is a no-op");

    assert!(registry.connections_for(GameId(1)).await.is_empty());
    assert_eq!(registry.username_of(ConnId(1)).await, None);
    assert_eq!(registry.connection_count().await, 0);
}

#[tokio::test]
async fn drop_all_reports_username_and_affected_games() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = channel();

    registry.join(GameId(5), "carol", ConnId(9), tx).await;

    let (username, games) = registry.drop_all(ConnId(9)).await;
    assert_eq!(username.as_deref(), Some("carol"));
    assert_eq!(games, vec![GameId(5)]);

    let (username, games) = registry.drop_all(ConnId(9)).await;
    assert_eq!(username, None);
    assert!(games.is_empty());
}

#[tokio::test]
async fn remove_game_evicts_every_participant() {
    let registry = SessionRegistry::new();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    registry.join(GameId(1), "alice", ConnId(1), tx1).await;
    registry.join(GameId(1), "bob", ConnId(2), tx2).await;

    registry.remove_game(GameId(1)).await;

    assert!(registry.connections_for(GameId(1)).await.is_empty());
    assert_eq!(registry.connection_count().await, 0);
    assert_eq!(registry.username_of(ConnId(1)).await, None);
    assert_eq!(registry.username_of(ConnId(2)).await, None);
}
