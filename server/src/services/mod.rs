//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the hub bookkeeping so the route handler can stay
//! focused on socket plumbing.

pub mod hub;
