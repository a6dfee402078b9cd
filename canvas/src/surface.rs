//! Drawing surface abstraction.
//!
//! [`Surface`] is the narrow set of immediate-mode primitives the paint client
//! needs: clear to a background, pick a fill, draw an ellipse, draw text.
//! Drawing is cumulative; nothing is ever erased after the initial clear.
//!
//! Two implementations exist. [`RecordingSurface`] keeps a display list of
//! [`DrawOp`]s and backs the tests and the native CLI. `WebSurface` (feature
//! `web`, see [`crate::render`]) draws onto a browser `<canvas>`.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::Serialize;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string, e.g. `rgb(0, 255, 255)`.
    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Immediate-mode 2D drawing primitives.
///
/// Fill and stroke settings are sticky: they apply to every shape drawn
/// after them until changed.
pub trait Surface {
    /// Size the surface, in CSS pixels.
    fn resize(&mut self, width: u32, height: u32);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Paint the whole surface with `color`. Does not change the fill.
    fn background(&mut self, color: Color);

    /// Set the fill used by later shapes and text.
    fn fill(&mut self, color: Color);

    /// Disable outlines for later shapes.
    fn no_stroke(&mut self);

    /// Draw an ellipse centered at (`cx`, `cy`) with the given diameters.
    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64);

    /// Set the font size used by later text, in pixels.
    fn text_size(&mut self, px: f64);

    /// Draw `text` with its baseline starting at (`x`, `y`).
    fn text(&mut self, text: &str, x: f64, y: f64);
}

/// One recorded drawing command with the style that was active for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Background {
        color: Color,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        fill: Color,
        stroke: bool,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        fill: Color,
    },
}

impl DrawOp {
    /// Encode as a single JSON line.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A surface that records every command instead of rasterizing it.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    fill: Color,
    stroke: bool,
    text_size: f64,
    ops: Vec<DrawOp>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            fill: Color::rgb(255, 255, 255),
            stroke: true,
            text_size: 12.0,
            ops: Vec::new(),
        }
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Only the ellipse commands, oldest first.
    pub fn ellipses(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Ellipse { .. }))
    }

    /// Remove and return all recorded commands.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn background(&mut self, color: Color) {
        self.ops.push(DrawOp::Background { color });
    }

    fn fill(&mut self, color: Color) {
        self.fill = color;
    }

    fn no_stroke(&mut self) {
        self.stroke = false;
    }

    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Ellipse { cx, cy, width, height, fill: self.fill, stroke: self.stroke });
    }

    fn text_size(&mut self, px: f64) {
        self.text_size = px;
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::Text { text: text.to_owned(), x, y, size: self.text_size, fill: self.fill });
    }
}
