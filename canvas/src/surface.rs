//! Drawing surface: logical ↔ device coordinate mapping and the frame model
//! shared by every layer.
//!
//! A [`Surface`] describes one canvas element: its CSS size and device pixel
//! ratio. All layers draw in logical game units (`GAME_WIDTH × GAME_HEIGHT`);
//! the surface supplies the single scale factor that maps those units onto
//! the backing store, and the inverse used for pointer events.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::consts::{GAME_HEIGHT, GAME_WIDTH, RATIO};
use crate::geometry::{Point, rescale};
use crate::paint::{PaintError, Painter};

/// Size of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Displayed width in CSS pixels.
    pub css_width: f64,
    /// Displayed height in CSS pixels.
    pub css_height: f64,
    /// Device pixels per CSS pixel.
    pub dpr: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self { css_width: 0.0, css_height: 0.0, dpr: 1.0 }
    }
}

impl Surface {
    /// Largest surface with the course aspect ratio that fits the available box.
    #[must_use]
    pub fn fit(available_width: f64, available_height: f64, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let available_width = clean(available_width);
        let available_height = clean(available_height);

        let mut css_width = available_width;
        let mut css_height = css_width * RATIO;
        if css_height > available_height {
            css_height = available_height;
            css_width = css_height / RATIO;
        }
        Self { css_width, css_height, dpr }
    }

    /// A surface with no area (e.g. before first layout) cannot be drawn to.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.css_width > 0.0 && self.css_height > 0.0) || !self.dpr.is_finite() || self.dpr <= 0.0
    }

    /// Backing store width in device pixels.
    #[must_use]
    pub fn device_width(&self) -> f64 {
        (self.css_width * self.dpr).round()
    }

    /// Backing store height in device pixels.
    #[must_use]
    pub fn device_height(&self) -> f64 {
        (self.css_height * self.dpr).round()
    }

    /// Device pixels per logical unit. Zero for a degenerate surface.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        rescale(1.0, 0.0, GAME_WIDTH, 0.0, self.css_width * self.dpr)
    }

    /// Logical point to CSS pixels.
    #[must_use]
    pub fn to_device(&self, p: Point) -> Point {
        Point::new(
            rescale(p.x, 0.0, GAME_WIDTH, 0.0, self.css_width),
            rescale(p.y, 0.0, GAME_HEIGHT, 0.0, self.css_height),
        )
    }

    /// CSS pixels to a logical point; the inverse of [`Surface::to_device`].
    #[must_use]
    pub fn to_logical(&self, p: Point) -> Point {
        Point::new(
            rescale(p.x, 0.0, self.css_width, 0.0, GAME_WIDTH),
            rescale(p.y, 0.0, self.css_height, 0.0, GAME_HEIGHT),
        )
    }

    /// Pointer client coordinates to a logical point, given the element's
    /// bounding-rect origin.
    #[must_use]
    pub fn pointer_to_logical(&self, client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
        self.to_logical(Point::new(client_x - rect_left, client_y - rect_top))
    }
}

fn clean(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

// =============================================================
// Frames and layers
// =============================================================

/// Whether a layer redraws every animation frame or only on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Continuous,
    OnDemand,
}

/// Per-frame context handed to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInfo {
    /// Frames rendered so far by a continuous loop; always 0 on demand.
    pub tick: u64,
    /// Milliseconds on the host's monotonic clock.
    pub now_ms: f64,
}

/// Tick bookkeeping for one render loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    mode: LoopMode,
    tick: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new(mode: LoopMode) -> Self {
        Self { mode, tick: 0 }
    }

    #[must_use]
    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    /// Info for the next frame to draw.
    pub fn advance(&mut self, now_ms: f64) -> FrameInfo {
        if self.mode == LoopMode::Continuous {
            self.tick = self.tick.wrapping_add(1);
        }
        FrameInfo { tick: self.tick, now_ms }
    }
}

/// One visual layer bound to its own surface.
pub trait Layer {
    fn loop_mode(&self) -> LoopMode {
        LoopMode::OnDemand
    }

    /// Draw the layer in logical units. The painter is already cleared and scaled.
    ///
    /// # Errors
    ///
    /// Propagates any drawing backend failure.
    fn render(&mut self, painter: &mut dyn Painter, frame: FrameInfo) -> Result<(), PaintError>;
}

/// Clear the painter and draw `layer`, skipping degenerate surfaces.
///
/// Returns whether anything was drawn.
///
/// # Errors
///
/// Propagates any drawing backend failure.
pub fn render_frame(
    surface: &Surface,
    layer: &mut dyn Layer,
    painter: &mut dyn Painter,
    frame: FrameInfo,
) -> Result<bool, PaintError> {
    if surface.is_degenerate() {
        return Ok(false);
    }
    painter.clear();
    layer.render(painter, frame)?;
    Ok(true)
}
