//! Unit tests for `WsManager`.
//!
//! These exercise the connection manager directly, without performing any
//! HTTP upgrades.

use axum::extract::ws::Message;
use flash_api::ws::WsManager;
use flash_core::table::Table;

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_count() {
    let manager = WsManager::new();

    let _conn = manager.add("conn-1".to_string(), Table::Waitlist).await;
    let _other = manager.add("conn-2".to_string(), Table::Submissions).await;
    assert_eq!(manager.connection_count().await, 2);
    assert_eq!(manager.count_for_table(Table::Waitlist).await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 1);
    assert_eq!(manager.count_for_table(Table::Waitlist).await, 0);
}

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();
    let _conn = manager.add("conn-1".to_string(), Table::Waitlist).await;

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn remove_returns_the_connection() {
    let manager = WsManager::new();
    let before = chrono::Utc::now();
    let _conn = manager.add("conn-1".to_string(), Table::Submissions).await;

    let conn = manager.remove("conn-1").await.expect("registered");
    assert_eq!(conn.table, Table::Submissions);
    assert!(conn.connected_at >= before);
    assert!(manager.remove("conn-1").await.is_none());
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let (_tx, mut rx) = manager.add("conn-1".to_string(), Table::Submissions).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx.recv().await, Some(Message::Close(None))));
}

#[tokio::test]
async fn ping_all_sends_ping() {
    let manager = WsManager::new();
    let (_tx, mut rx) = manager.add("conn-1".to_string(), Table::Waitlist).await;

    manager.ping_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
}
