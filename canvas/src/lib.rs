//! Paint client for the realtime drawing relay.
//!
//! A full-window canvas paints a circle at every pointer-drag sample and
//! forwards the coordinate over one WebSocket; every coordinate that arrives
//! from the relay is painted too. The core ([`client::RealtimePaintClient`])
//! is host-agnostic: it is driven by the browser glue in [`web`] when built
//! with the `web` feature, and by the native `cli` crate otherwise.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`client`] | Connection state machine, inbound/outbound dispatch |
//! | [`surface`] | [`surface::Surface`] trait and the recording implementation |
//! | [`input`] | Pointer types and the drag state machine |
//! | [`consts`] | Endpoint, colors, radius, overlay text |
//! | `render` | `<canvas>` 2D surface (feature `web`) |
//! | `web` | `start()` entry point and DOM/socket wiring (feature `web`) |

pub mod client;
pub mod consts;
pub mod input;
#[cfg(feature = "web")]
pub mod render;
pub mod surface;
#[cfg(feature = "web")]
pub mod web;

pub use client::{ConnectionState, RealtimePaintClient, SendError, Transport, TransportError};
pub use surface::{Color, DrawOp, RecordingSurface, Surface};
