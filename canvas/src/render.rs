//! Browser rendering: [`Surface`] over a `<canvas>` 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Fallible `Canvas2D` calls are logged and skipped; a failed draw call must
//! not take down the frame loop.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::surface::{Color, Surface};

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    fill: Color,
    /// Outline toggle. No stroke color is ever set, so an outline uses the
    /// context's default black `strokeStyle`.
    stroke: bool,
}

impl WebSurface {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx, fill: Color::rgb(255, 255, 255), stroke: true }
    }
}

impl Surface for WebSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn background(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.ctx.set_fill_style_str(&self.fill.css());
    }

    fn fill(&mut self, color: Color) {
        self.fill = color;
        self.ctx.set_fill_style_str(&color.css());
    }

    fn no_stroke(&mut self) {
        self.stroke = false;
    }

    fn ellipse(&mut self, cx: f64, cy: f64, width: f64, height: f64) {
        self.ctx.begin_path();
        if let Err(err) = self.ctx.ellipse(cx, cy, width / 2.0, height / 2.0, 0.0, 0.0, TAU) {
            log::warn!("ellipse failed: {err:?}");
            return;
        }
        self.ctx.fill();
        if self.stroke {
            self.ctx.stroke();
        }
    }

    fn text_size(&mut self, px: f64) {
        self.ctx.set_font(&format!("{px}px sans-serif"));
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        if let Err(err) = self.ctx.fill_text(text, x, y) {
            log::warn!("fill_text failed: {err:?}");
        }
    }
}
