//! [`Painter`] over a `CanvasRenderingContext2d`.
//!
//! This is the only place that touches the 2D context. Logical units are
//! mapped to device pixels by the base transform set in [`Painter::clear`].

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::js_error;
use crate::geometry::Point;
use crate::paint::{Fill, PaintError, Painter, PathOp, Shadow, Stroke, TextAlign, TextStyle};
use crate::surface::Surface;

fn backend(e: &JsValue) -> PaintError {
    PaintError::Backend(js_error(e))
}

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    surface: Surface,
}

impl CanvasPainter {
    /// Painter for `canvas`'s 2D context.
    ///
    /// # Errors
    /// The canvas has no 2D context.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, PaintError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| backend(&e))?
            .ok_or(PaintError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PaintError::NoContext)?;
        Ok(Self { ctx, surface: Surface::default() })
    }

    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    fn trace(&self, path: &[PathOp]) -> Result<(), PaintError> {
        self.ctx.begin_path();
        for op in path {
            match *op {
                PathOp::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathOp::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathOp::ArcTo { corner, end, radius } => {
                    self.ctx.arc_to(corner.x, corner.y, end.x, end.y, radius).map_err(|e| backend(&e))?;
                }
                PathOp::Circle { center, radius } => {
                    self.ctx.move_to(center.x + radius, center.y);
                    self.ctx.arc(center.x, center.y, radius, 0.0, TAU).map_err(|e| backend(&e))?;
                }
                PathOp::Rect { origin, width, height } => self.ctx.rect(origin.x, origin.y, width, height),
                PathOp::Close => self.ctx.close_path(),
            }
        }
        Ok(())
    }
}

impl Painter for CanvasPainter {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear(&mut self) {
        let scale = self.surface.scale();
        let reset = self
            .ctx
            .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .and_then(|()| {
                self.ctx.clear_rect(0.0, 0.0, self.surface.device_width(), self.surface.device_height());
                self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
            });
        if let Err(e) = reset {
            log::warn!("canvas transform reset failed: {}", js_error(&e));
        }
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), PaintError> {
        self.ctx.translate(x, y).map_err(|e| backend(&e))
    }

    fn rotate(&mut self, angle: f64) -> Result<(), PaintError> {
        self.ctx.rotate(angle).map_err(|e| backend(&e))
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        match shadow {
            Some(shadow) => {
                // Shadow offsets ignore the transform, so scale them by hand.
                let scale = self.surface.scale();
                self.ctx.set_shadow_color(shadow.color);
                self.ctx.set_shadow_blur(shadow.blur * scale);
                self.ctx.set_shadow_offset_x(shadow.offset.x * scale);
                self.ctx.set_shadow_offset_y(shadow.offset.y * scale);
            }
            None => {
                self.ctx.set_shadow_color("transparent");
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_offset_x(0.0);
                self.ctx.set_shadow_offset_y(0.0);
            }
        }
    }

    fn fill(&mut self, path: &[PathOp], fill: Fill) -> Result<(), PaintError> {
        self.trace(path)?;
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(color),
            Fill::Radial { inner, outer, inner_radius, outer_radius } => {
                let gradient = self
                    .ctx
                    .create_radial_gradient(0.0, 0.0, inner_radius, 0.0, 0.0, outer_radius)
                    .map_err(|e| backend(&e))?;
                gradient.add_color_stop(0.0, inner).map_err(|e| backend(&e))?;
                gradient.add_color_stop(1.0, outer).map_err(|e| backend(&e))?;
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        self.ctx.fill();
        Ok(())
    }

    fn stroke(&mut self, path: &[PathOp], stroke: Stroke) -> Result<(), PaintError> {
        self.trace(path)?;
        let dash: js_sys::Array = stroke.dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        self.ctx.set_line_dash(&dash).map_err(|e| backend(&e))?;
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle) -> Result<(), PaintError> {
        self.ctx.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx.fill_text(text, at.x, at.y).map_err(|e| backend(&e))
    }
}
