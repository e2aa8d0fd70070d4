//! WebSocket handler streaming group events to clients
//!
//! Every connection receives all group events as JSON text frames until it
//! subscribes to a single group.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::domain::events::GroupEvent;
use crate::domain::value_objects::GroupId;
use crate::infrastructure::state::AppState;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Only receive events for this group
    Subscribe { group_id: GroupId },
    /// Receive events for every group again
    Unsubscribe,
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    Subscribed { group_id: Option<GroupId> },
    Event { event: GroupEvent },
    Pong,
    Error { code: String, message: String },
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let (filter_tx, filter_rx) = tokio::sync::watch::channel::<Option<GroupId>>(None);

    tracing::info!("New WebSocket connection established");

    // Forward queued messages to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Forward bus events that pass the filter
    let event_task = {
        let tx = tx.clone();
        let events = state.event_bus.subscribe();
        tokio::spawn(forward_events(events, filter_rx, tx))
    };

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => handle_message(msg, &filter_tx),
                    Err(e) => {
                        tracing::warn!("Failed to parse message: {}", e);
                        ServerMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            message: format!("Invalid message format: {}", e),
                        }
                    }
                };
                if tx.send(reply).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client");
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    event_task.abort();
    send_task.abort();
    tracing::info!("WebSocket connection terminated");
}

fn handle_message(
    msg: ClientMessage,
    filter: &tokio::sync::watch::Sender<Option<GroupId>>,
) -> ServerMessage {
    match msg {
        ClientMessage::Subscribe { group_id } => {
            filter.send_replace(Some(group_id));
            tracing::debug!(group_id = %group_id, "Client subscribed to group");
            ServerMessage::Subscribed {
                group_id: Some(group_id),
            }
        }
        ClientMessage::Unsubscribe => {
            filter.send_replace(None);
            ServerMessage::Subscribed { group_id: None }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}

async fn forward_events(
    mut events: broadcast::Receiver<GroupEvent>,
    filter: tokio::sync::watch::Receiver<Option<GroupId>>,
    tx: mpsc::UnboundedSender<ServerMessage>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if !passes_filter(&event, *filter.borrow()) {
                    continue;
                }
                if tx.send(ServerMessage::Event { event }).is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "WebSocket subscriber lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn passes_filter(event: &GroupEvent, filter: Option<GroupId>) -> bool {
    filter.map_or(true, |group_id| event.group_id == group_id)
}
