//! Shared constants for the canvas crate.

use crate::surface::Color;

// ── Network ─────────────────────────────────────────────────────

/// Relay endpoint the browser client connects to.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws";

// ── Circles ─────────────────────────────────────────────────────

/// Radius of every painted circle, in canvas pixels.
pub const CIRCLE_RADIUS: f64 = 10.0;

/// Fill for circles received from the relay.
pub const REMOTE_FILL: Color = Color::rgb(0, 255, 255);

/// Fill for circles painted by the local pointer.
pub const LOCAL_FILL: Color = Color::rgb(255, 0, 255);

// ── Surface ─────────────────────────────────────────────────────

/// Color the surface is cleared to once at setup.
pub const BACKGROUND: Color = Color::rgb(0, 0, 0);

// ── Overlay ─────────────────────────────────────────────────────

pub const OVERLAY_FILL: Color = Color::rgb(255, 255, 0);

pub const OVERLAY_LABEL: &str = "wuriyanto.com";
pub const OVERLAY_LABEL_SIZE: f64 = 20.0;
pub const OVERLAY_LABEL_POS: (f64, f64) = (10.0, 30.0);

pub const OVERLAY_YEAR: &str = "2019";
pub const OVERLAY_YEAR_SIZE: f64 = 18.0;
pub const OVERLAY_YEAR_POS: (f64, f64) = (10.0, 50.0);
