use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use flash_core::table::Table;
use flash_db::QueryError;
use flash_events::Snapshot;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::rbac::RequireAdminWs;
use crate::state::AppState;

/// Query parameters for `GET /admin/live`.
#[derive(Debug, Deserialize)]
pub struct LiveParams {
    pub table: Table,
}

/// GET /api/v1/admin/live?table=<submissions|waitlist>&token=<jwt>
///
/// Upgrades to a WebSocket that receives the table's full snapshot now and
/// again after every change. Admin only.
pub async fn live_feed(
    State(state): State<AppState>,
    Query(params): Query<LiveParams>,
    RequireAdminWs(user): RequireAdminWs,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    tracing::info!(subject = %user.subject, table = %params.table, "Live feed requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.table))
}

/// Render one live query delivery as a text frame.
///
/// `{"type":"snapshot","data":{"table":..,"rows":[..]}}` on success,
/// `{"type":"error","error":{"code":..,"message":..}}` on failure, with a
/// `setup_script` when the schema is missing.
pub fn live_message(result: Result<Snapshot, QueryError>) -> Message {
    let value = match result {
        Ok(snapshot) => json!({ "type": "snapshot", "data": snapshot }),
        Err(err) => {
            let schema_missing = err.is_schema_missing();
            let mut value = json!({ "type": "error", "error": err });
            if schema_missing {
                value["setup_script"] = json!(flash_db::SETUP_SCRIPT);
            }
            value
        }
    };
    Message::Text(value.to_string().into())
}

/// Manage a single live-feed connection after upgrade.
///
/// Registers the connection, subscribes to the table, forwards deliveries
/// to the socket and tears everything down when the client goes away.
async fn handle_socket(socket: WebSocket, state: AppState, table: Table) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, table = %table, "WebSocket connected");

    let (tx, mut rx) = state.ws_manager.add(conn_id.clone(), table).await;

    let subscription = state.live_query.subscribe(table, move |result| {
        let _ = tx.send(live_message(result));
    });

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    // Inbound messages are ignored apart from close and pong.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    subscription.unsubscribe().await;
    let connected_secs = state
        .ws_manager
        .remove(&conn_id)
        .await
        .map(|conn| (chrono::Utc::now() - conn.connected_at).num_seconds());
    send_task.abort();
    tracing::info!(conn_id = %conn_id, table = %table, ?connected_secs, "WebSocket disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(message: Message) -> serde_json::Value {
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_message_carries_rows() {
        let value = text(live_message(Ok(Snapshot::Waitlist(Vec::new()))));
        assert_eq!(value["type"], "snapshot");
        assert_eq!(value["data"]["table"], "waitlist");
        assert_eq!(value["data"]["rows"], json!([]));
    }

    #[test]
    fn schema_missing_message_carries_setup_script() {
        let err = QueryError::new(flash_db::SCHEMA_MISSING, "relation \"waitlist\" does not exist");
        let value = text(live_message(Err(err)));
        assert_eq!(value["type"], "error");
        assert_eq!(value["error"]["code"], "SCHEMA_MISSING");
        assert!(value["setup_script"].as_str().unwrap().contains("CREATE TABLE"));
    }

    #[test]
    fn other_errors_have_no_setup_script() {
        let value = text(live_message(Err(QueryError::new("QUERY_FAILED", "timeout"))));
        assert_eq!(value["error"]["message"], "timeout");
        assert!(value.get("setup_script").is_none());
    }
}
