//! WebSocket handler — point relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, registers an outbound queue with the
//! hub and enters a `select!` loop:
//! - Incoming text frames → decode as a point → broadcast to every socket
//! - Frames queued by the hub → forward to this socket
//!
//! Inbound frames that do not decode are logged and dropped; they never end
//! the connection and are never broadcast. Broadcast frames are re-encoded
//! from the decoded point, so peers only ever see the canonical `{x,y}` form.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register with hub
//! 2. Text frame → decode → broadcast (sender included)
//! 3. Close, read error, write error, or hub eviction → unregister

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use frames::CodecError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::hub::{self, BroadcastReport};
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, headers: HeaderMap, ws: WebSocketUpgrade) -> Response {
    let client_id = Uuid::new_v4();
    if let Some(key) = headers.get("sec-websocket-key").and_then(|v| v.to_str().ok()) {
        debug!(%client_id, key, "ws: upgrade requested");
    }
    ws.on_upgrade(move |socket| run_ws(socket, state, client_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, client_id: Uuid) {
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.client_buffer);
    hub::register(&state, client_id, client_tx).await;
    let clients = state.client_count().await;
    info!(%client_id, clients, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        // Bad frames are already logged; the loop keeps going.
                        if let Ok(report) = process_inbound_text(&state, client_id, text.as_str()).await {
                            debug!(%client_id, delivered = report.delivered, evicted = report.evicted.len(), "ws: relayed point");
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outbound = client_rx.recv() => {
                let Some(text) = outbound else {
                    warn!(%client_id, "ws: evicted by hub");
                    break;
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    hub::unregister(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Decode one inbound text frame and broadcast it to every socket.
///
/// Kept separate from the socket loop so tests can drive relay behavior
/// without a live connection.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Result<BroadcastReport, CodecError> {
    let point = match frames::decode_point(text) {
        Ok(point) => point,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            return Err(e);
        }
    };
    Ok(hub::broadcast(state, &frames::encode_point(&point)).await)
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
