//! WebSocket notification endpoint

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

/// Upgrade to a WebSocket and stream broadcast notifications
#[utoipa::path(
    get,
    path = "/ws",
    tag = "notifications",
    responses(
        (status = 101, description = "Switching Protocols (WebSocket upgrade)")
    )
)]
pub async fn notifications_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.notifications.clone();
    ws.on_upgrade(move |socket| handle_client(socket, hub))
}

/// Forward broadcast messages to one client until it disconnects
async fn handle_client(socket: WebSocket, hub: crate::services::notifications::NotificationHub) {
    tracing::debug!("WebSocket client connected");

    let mut receiver = hub.subscribe();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            notification = receiver.recv() => {
                match notification {
                    Ok(message) => {
                        if sink.send(Message::Text(message)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagged, skipped {} notifications", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            // Drain client frames so close/ping are handled; inbound text is ignored
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}
