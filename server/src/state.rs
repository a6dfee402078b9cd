//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the hub: every connected socket keyed by a per-connection
//! `client_id`, mapped to the sender half of that socket's outbound queue.
//! Dropping a sender from the map closes that socket.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::DEFAULT_CLIENT_BUFFER;

/// Connected sockets: `client_id` -> outbound text frames.
pub type Clients = HashMap<Uuid, mpsc::Sender<String>>;

/// Shared application state. Clone is required by Axum; all fields are
/// `Arc`-wrapped or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<RwLock<Clients>>,
    /// Capacity of each socket's outbound queue.
    pub client_buffer: usize,
}

impl AppState {
    #[must_use]
    pub fn new(client_buffer: usize) -> Self {
        Self { clients: Arc::new(RwLock::new(HashMap::new())), client_buffer }
    }

    /// Number of sockets currently registered.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_BUFFER)
    }
}
