//! Realtime paint client: connection state machine and message dispatch.
//!
//! DESIGN
//! ======
//! `RealtimePaintClient` owns an explicit [`Surface`] and an explicit
//! [`Transport`]. The host (browser glue or the native CLI) wires its event
//! loop to the five entry points below and never touches the socket or the
//! surface directly:
//!
//! | Entry point | Fires on |
//! |-------------|----------|
//! | [`RealtimePaintClient::setup`] | startup, once |
//! | [`RealtimePaintClient::draw`] | every animation frame |
//! | [`RealtimePaintClient::mouse_dragged`] | every drag sample |
//! | [`RealtimePaintClient::on_message`] | every inbound text frame |
//! | [`RealtimePaintClient::on_open`] / [`RealtimePaintClient::on_close`] | socket lifecycle |
//!
//! LIFECYCLE
//! =========
//! `Connecting → Open → Closed`, or `Connecting → Closed` when the handshake
//! fails. `Closed` is terminal; there is no reconnect. Sends are only handed
//! to the transport while `Open`, and nothing is queued otherwise.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::fmt;

use frames::{CodecError, PointEvent};

use crate::consts::{
    BACKGROUND, CIRCLE_RADIUS, LOCAL_FILL, OVERLAY_FILL, OVERLAY_LABEL, OVERLAY_LABEL_POS, OVERLAY_LABEL_SIZE,
    OVERLAY_YEAR, OVERLAY_YEAR_POS, OVERLAY_YEAR_SIZE, REMOTE_FILL,
};
use crate::surface::{Color, Surface};

// =============================================================================
// TRANSPORT
// =============================================================================

/// Error reported by a [`Transport`] when a frame cannot be handed off.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("transport send failed: {0}")]
    Send(String),
}

/// Outbound half of the socket. Delivery is the transport's concern.
pub trait Transport {
    /// Hand one text frame to the connection.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the underlying socket refused it.
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;
}

// =============================================================================
// CONNECTION STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => f.write_str("connecting"),
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Why a point was not sent.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("connection is {0}, not open")]
    NotOpen(ConnectionState),
    #[error("invalid point: {0}")]
    InvalidPoint(#[from] CodecError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// =============================================================================
// OVERLAY
// =============================================================================

/// One line of static text redrawn every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

/// Static text drawn on top of the painting every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub fill: Color,
    pub lines: Vec<OverlayLine>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            fill: OVERLAY_FILL,
            lines: vec![
                OverlayLine {
                    text: OVERLAY_LABEL.to_owned(),
                    size: OVERLAY_LABEL_SIZE,
                    x: OVERLAY_LABEL_POS.0,
                    y: OVERLAY_LABEL_POS.1,
                },
                OverlayLine {
                    text: OVERLAY_YEAR.to_owned(),
                    size: OVERLAY_YEAR_SIZE,
                    x: OVERLAY_YEAR_POS.0,
                    y: OVERLAY_YEAR_POS.1,
                },
            ],
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct RealtimePaintClient<S, T> {
    surface: S,
    transport: T,
    state: ConnectionState,
    overlay: Overlay,
    sent: u64,
}

impl<S: Surface, T: Transport> RealtimePaintClient<S, T> {
    /// Wrap a surface and a transport whose connection is being established.
    #[must_use]
    pub fn new(surface: S, transport: T) -> Self {
        Self { surface, transport, state: ConnectionState::Connecting, overlay: Overlay::default(), sent: 0 }
    }

    /// Replace the default overlay text.
    #[must_use]
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = overlay;
        self
    }

    // --- Host callbacks ---

    /// Size the surface to the window and clear it once.
    pub fn setup(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.surface.background(BACKGROUND);
    }

    /// Redraw the overlay. Circles are left in place.
    pub fn draw(&mut self) {
        self.surface.fill(self.overlay.fill);
        for line in &self.overlay.lines {
            self.surface.text_size(line.size);
            self.surface.text(&line.text, line.x, line.y);
        }
    }

    /// Handshake completed. Returns `false` if the event was ignored.
    pub fn on_open(&mut self) -> bool {
        if self.state != ConnectionState::Connecting {
            log::debug!("ignoring open event while {}", self.state);
            return false;
        }
        self.state = ConnectionState::Open;
        log::info!("socket connected");
        true
    }

    /// Connection went away. Returns `false` if it was already closed.
    pub fn on_close(&mut self) -> bool {
        if self.state == ConnectionState::Closed {
            return false;
        }
        self.state = ConnectionState::Closed;
        log::info!("socket closed");
        true
    }

    /// Decode an inbound frame and paint it.
    ///
    /// A bad frame paints nothing and leaves the client ready for the next one.
    ///
    /// # Errors
    ///
    /// Returns the [`CodecError`] from decoding.
    pub fn on_message(&mut self, text: &str) -> Result<PointEvent, CodecError> {
        let point = frames::decode_point(text)?;
        self.paint_circle(REMOTE_FILL, point.x, point.y);
        Ok(point)
    }

    /// Paint a local drag sample, then forward it.
    ///
    /// The circle is painted even when the send fails.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] when the point was not handed to the transport.
    pub fn mouse_dragged(&mut self, x: f64, y: f64) -> Result<(), SendError> {
        self.paint_circle(LOCAL_FILL, x, y);
        let point = PointEvent::new(x, y)?;
        self.send(point)
    }

    /// Send one point over the connection.
    ///
    /// # Errors
    ///
    /// [`SendError::NotOpen`] unless the connection is open, or the
    /// transport's own failure.
    pub fn send(&mut self, point: PointEvent) -> Result<(), SendError> {
        if self.state != ConnectionState::Open {
            return Err(SendError::NotOpen(self.state));
        }
        self.transport.send_text(&frames::encode_point(&point))?;
        self.sent += 1;
        Ok(())
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Points successfully handed to the transport.
    #[must_use]
    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn paint_circle(&mut self, fill: Color, x: f64, y: f64) {
        let diameter = CIRCLE_RADIUS * 2.0;
        self.surface.fill(fill);
        self.surface.no_stroke();
        self.surface.ellipse(x, y, diameter, diameter);
    }
}
