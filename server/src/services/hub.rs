//! Hub service — socket registry and point broadcast.
//!
//! DESIGN
//! ======
//! Every connected socket registers a bounded outbound queue. A valid point
//! received from any socket is fanned out to every registered socket,
//! including the one that sent it.
//!
//! ERROR HANDLING
//! ==============
//! Broadcast never waits on a slow socket. If a socket's queue is full or its
//! receiver is gone, the socket is evicted: its sender is dropped, which ends
//! that connection's task and closes the socket.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sockets the frame was queued for.
    pub delivered: usize,
    /// Sockets dropped from the hub during this broadcast.
    pub evicted: Vec<Uuid>,
}

/// Add a socket to the hub. Replaces any previous sender for the same id.
pub async fn register(state: &AppState, client_id: Uuid, tx: mpsc::Sender<String>) {
    let mut clients = state.clients.write().await;
    clients.insert(client_id, tx);
    debug!(%client_id, total = clients.len(), "hub: registered");
}

/// Remove a socket from the hub. Returns `false` if it was not registered
/// (already evicted, or never joined).
pub async fn unregister(state: &AppState, client_id: Uuid) -> bool {
    let mut clients = state.clients.write().await;
    let removed = clients.remove(&client_id).is_some();
    if removed {
        debug!(%client_id, total = clients.len(), "hub: unregistered");
    }
    removed
}

/// Queue `text` for every registered socket, evicting any that cannot take it.
pub async fn broadcast(state: &AppState, text: &str) -> BroadcastReport {
    let mut clients = state.clients.write().await;
    let mut report = BroadcastReport::default();

    for (client_id, tx) in clients.iter() {
        match tx.try_send(text.to_owned()) {
            Ok(()) => report.delivered += 1,
            Err(TrySendError::Full(_)) => {
                warn!(%client_id, "hub: outbound queue full, evicting");
                report.evicted.push(*client_id);
            }
            Err(TrySendError::Closed(_)) => {
                debug!(%client_id, "hub: receiver gone, evicting");
                report.evicted.push(*client_id);
            }
        }
    }

    for client_id in &report.evicted {
        clients.remove(client_id);
    }
    report
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
