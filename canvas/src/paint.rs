//! Drawing primitives in logical units.
//!
//! [`Painter`] is the seam between layer logic and the drawing backend. The
//! browser implementation lives in [`crate::web::painter`]; tests use a
//! recording implementation. Transform state is pushed and popped through
//! [`Scoped`], which restores on drop so every exit path rebalances the stack.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use std::ops::{Deref, DerefMut};

use crate::geometry::Point;

/// A drawing backend call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    #[error("drawing backend error: {0}")]
    Backend(String),
    #[error("no 2d context available")]
    NoContext,
}

/// One step of a path, in the current transform's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Canvas `arcTo`: tangent arc toward `corner`, ending in the direction of `end`.
    ArcTo { corner: Point, end: Point, radius: f64 },
    Circle { center: Point, radius: f64 },
    Rect { origin: Point, width: f64, height: f64 },
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(&'static str),
    /// Radial gradient centred on the local origin.
    Radial {
        inner: &'static str,
        outer: &'static str,
        inner_radius: f64,
        outer_radius: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    /// Empty for a solid line.
    pub dash: &'static [f64],
}

impl Stroke {
    #[must_use]
    pub const fn solid(color: &'static str, width: f64) -> Self {
        Self { color, width, dash: &[] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: &'static str,
    pub blur: f64,
    pub offset: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: &'static str,
    pub align: TextAlign,
}

/// Drawing backend. Coordinates are logical game units under the current
/// transform; the backend owns the mapping to device pixels.
pub trait Painter {
    /// Push transform and style state.
    fn save(&mut self);
    /// Pop transform and style state.
    fn restore(&mut self);
    /// Reset the transform and erase the whole surface.
    fn clear(&mut self);

    /// # Errors
    /// Backend failure.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), PaintError>;

    /// # Errors
    /// Backend failure.
    fn rotate(&mut self, angle: f64) -> Result<(), PaintError>;

    /// Shadow applied to subsequent fills and strokes until restored.
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// # Errors
    /// Backend failure.
    fn fill(&mut self, path: &[PathOp], fill: Fill) -> Result<(), PaintError>;

    /// # Errors
    /// Backend failure.
    fn stroke(&mut self, path: &[PathOp], stroke: Stroke) -> Result<(), PaintError>;

    /// # Errors
    /// Backend failure.
    fn text(&mut self, text: &str, at: Point, style: TextStyle) -> Result<(), PaintError>;
}

/// Saved painter state, restored when dropped.
pub struct Scoped<'a> {
    painter: &'a mut dyn Painter,
}

impl<'a> Scoped<'a> {
    pub fn new(painter: &'a mut dyn Painter) -> Self {
        painter.save();
        Self { painter }
    }
}

impl Drop for Scoped<'_> {
    fn drop(&mut self) {
        self.painter.restore();
    }
}

impl<'a> Deref for Scoped<'a> {
    type Target = dyn Painter + 'a;

    fn deref(&self) -> &Self::Target {
        self.painter
    }
}

impl DerefMut for Scoped<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.painter
    }
}

/// Run `draw` with the origin moved to `at` and rotated by `angle`, then
/// restore, even when `draw` fails.
///
/// # Errors
///
/// Propagates the first backend failure.
pub fn with_transform<F>(painter: &mut dyn Painter, at: Point, angle: f64, draw: F) -> Result<(), PaintError>
where
    F: FnOnce(&mut dyn Painter) -> Result<(), PaintError>,
{
    let mut scope = Scoped::new(painter);
    scope.translate(at.x, at.y)?;
    scope.rotate(angle)?;
    draw(&mut *scope)
}

// =============================================================
// Path builders
// =============================================================

#[must_use]
pub fn circle(center: Point, radius: f64) -> [PathOp; 1] {
    [PathOp::Circle { center, radius }]
}

#[must_use]
pub fn line(from: Point, to: Point) -> [PathOp; 2] {
    [PathOp::MoveTo(from), PathOp::LineTo(to)]
}

/// Axis-aligned square of side `size` centred on `center`.
#[must_use]
pub fn square(center: Point, size: f64) -> [PathOp; 1] {
    let half = size / 2.0;
    [PathOp::Rect { origin: Point::new(center.x - half, center.y - half), width: size, height: size }]
}

/// Two crossing strokes of half-length `reach` around `at`.
#[must_use]
pub fn crosshair(at: Point, reach: f64) -> [PathOp; 4] {
    [
        PathOp::MoveTo(Point::new(at.x, at.y - reach)),
        PathOp::LineTo(Point::new(at.x, at.y + reach)),
        PathOp::MoveTo(Point::new(at.x - reach, at.y)),
        PathOp::LineTo(Point::new(at.x + reach, at.y)),
    ]
}
