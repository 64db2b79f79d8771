#![allow(clippy::float_cmp)]

use super::*;
use crate::recorder::{Call, Recorder};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

struct Dot;

impl Layer for Dot {
    fn render(&mut self, painter: &mut dyn Painter, _frame: FrameInfo) -> Result<(), PaintError> {
        painter.set_shadow(None);
        Ok(())
    }
}

// =============================================================
// Fit
// =============================================================

#[test]
fn fit_keeps_course_ratio_when_width_bound() {
    let surface = Surface::fit(980.0, 2000.0, 1.0);
    assert!(approx_eq(surface.css_width, 980.0));
    assert!(approx_eq(surface.css_height, 500.0));
}

#[test]
fn fit_keeps_course_ratio_when_height_bound() {
    let surface = Surface::fit(4000.0, 500.0, 2.0);
    assert!(approx_eq(surface.css_height, 500.0));
    assert!(approx_eq(surface.css_width, 980.0));
    assert!(approx_eq(surface.device_width(), 1960.0));
    assert!(approx_eq(surface.device_height(), 1000.0));
}

#[test]
fn fit_sanitises_bad_input() {
    let surface = Surface::fit(f64::NAN, -3.0, 0.0);
    assert_eq!(surface.dpr, 1.0);
    assert!(surface.is_degenerate());
}

#[test]
fn default_surface_is_degenerate() {
    assert!(Surface::default().is_degenerate());
    assert_eq!(Surface::default().scale(), 0.0);
}

// =============================================================
// Coordinate mapping
// =============================================================

#[test]
fn scale_maps_course_width_to_backing_store() {
    let surface = Surface { css_width: 980.0, css_height: 500.0, dpr: 2.0 };
    assert!(approx_eq(surface.scale() * GAME_WIDTH, 1960.0));
}

#[test]
fn logical_and_device_are_inverse() {
    let surface = Surface { css_width: 980.0, css_height: 500.0, dpr: 1.5 };
    let p = Point::new(1234.0, 987.0);
    let back = surface.to_logical(surface.to_device(p));
    assert!(approx_eq(back.x, p.x));
    assert!(approx_eq(back.y, p.y));
}

#[test]
fn pointer_is_offset_by_bounding_rect() {
    let surface = Surface { css_width: 980.0, css_height: 500.0, dpr: 1.0 };
    let p = surface.pointer_to_logical(510.0, 260.0, 20.0, 10.0);
    assert!(approx_eq(p.x, 2450.0));
    assert!(approx_eq(p.y, 1250.0));
}

#[test]
fn pointer_on_degenerate_surface_maps_to_origin() {
    let p = Surface::default().pointer_to_logical(50.0, 50.0, 0.0, 0.0);
    assert_eq!(p, Point::new(0.0, 0.0));
}

// =============================================================
// Frames
// =============================================================

#[test]
fn continuous_clock_ticks_every_frame() {
    let mut clock = FrameClock::new(LoopMode::Continuous);
    assert_eq!(clock.advance(16.0).tick, 1);
    let frame = clock.advance(32.0);
    assert_eq!(frame.tick, 2);
    assert_eq!(frame.now_ms, 32.0);
}

#[test]
fn on_demand_clock_never_ticks() {
    let mut clock = FrameClock::new(LoopMode::OnDemand);
    clock.advance(1.0);
    assert_eq!(clock.advance(2.0).tick, 0);
    assert_eq!(clock.mode(), LoopMode::OnDemand);
}

#[test]
fn render_frame_clears_then_draws() {
    let surface = Surface { css_width: 980.0, css_height: 500.0, dpr: 1.0 };
    let mut rec = Recorder::new();

    let drawn = render_frame(&surface, &mut Dot, &mut rec, FrameInfo::default()).expect("render");

    assert!(drawn);
    assert_eq!(rec.calls, vec![Call::Clear, Call::Shadow(None)]);
}

#[test]
fn render_frame_skips_degenerate_surface() {
    let mut rec = Recorder::new();

    let drawn = render_frame(&Surface::default(), &mut Dot, &mut rec, FrameInfo::default()).expect("render");

    assert!(!drawn);
    assert!(rec.calls.is_empty());
}

#[test]
fn layers_default_to_on_demand() {
    assert_eq!(Dot.loop_mode(), LoopMode::OnDemand);
}
