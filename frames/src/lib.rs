//! Shared point model and JSON codec for the paint relay wire.
//!
//! This crate owns the wire representation used by the `server`, the
//! browser `canvas` client and the native `cli`. Every WebSocket text frame
//! carries exactly one [`PointEvent`] encoded as a flat JSON object:
//!
//! ```json
//! {"x":100.0,"y":50.0}
//! ```
//!
//! There is no type tag, no version and no acknowledgment. Decoding is strict:
//! unknown fields, missing fields, non-numeric values and negative
//! coordinates are all rejected with a [`CodecError`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_point`] and [`PointEvent::new`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not a JSON object of the form `{"x":<number>,"y":<number>}`.
    #[error("invalid point payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A coordinate is NaN or infinite.
    #[error("non-finite {axis} coordinate")]
    NonFinite { axis: Axis },
    /// A coordinate lies left of or above the canvas origin.
    #[error("negative {axis} coordinate: {value}")]
    NegativeCoordinate { axis: Axis, value: f64 },
}

/// Which coordinate a validation error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// A 2D pixel coordinate in canvas space.
///
/// Constructed transiently when a drag sample or inbound frame arrives and
/// dropped once it has been drawn or sent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointEvent {
    pub x: f64,
    pub y: f64,
}

impl PointEvent {
    /// Build a point, rejecting non-finite or negative coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NonFinite`] or [`CodecError::NegativeCoordinate`]
    /// naming the first offending axis.
    pub fn new(x: f64, y: f64) -> Result<Self, CodecError> {
        check_axis(Axis::X, x)?;
        check_axis(Axis::Y, y)?;
        Ok(Self { x, y })
    }
}

/// Raw wire shape before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WirePoint {
    x: f64,
    y: f64,
}

/// Encode a point as a JSON text frame.
#[must_use]
pub fn encode_point(point: &PointEvent) -> String {
    // Two finite f64 fields always serialize; the fallback is never hit.
    serde_json::to_string(point).unwrap_or_default()
}

/// Decode a JSON text frame into a validated point.
///
/// # Errors
///
/// Returns [`CodecError::InvalidJson`] for anything that is not exactly an
/// `{x, y}` object of numbers, and a range error for negative coordinates.
pub fn decode_point(text: &str) -> Result<PointEvent, CodecError> {
    let wire: WirePoint = serde_json::from_str(text)?;
    PointEvent::new(wire.x, wire.y)
}

fn check_axis(axis: Axis, value: f64) -> Result<(), CodecError> {
    if !value.is_finite() {
        return Err(CodecError::NonFinite { axis });
    }
    if value < 0.0 {
        return Err(CodecError::NegativeCoordinate { axis, value });
    }
    Ok(())
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
