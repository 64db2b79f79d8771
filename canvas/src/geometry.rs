//! Pure geometry helpers in logical game space.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

pub use wire::map::Point;
use wire::map::Rotation;

use crate::consts::BLOCK_SIZE;

/// Linearly map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// A zero-width input range maps everything to `out_min`.
#[must_use]
pub fn rescale(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span == 0.0 || !span.is_finite() {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / span + out_min
}

#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Offset from `from` to `to`.
#[must_use]
pub fn offset(from: Point, to: Point) -> Point {
    Point::new(to.x - from.x, to.y - from.y)
}

#[must_use]
pub fn translate(p: Point, by: Point) -> Point {
    Point::new(p.x + by.x, p.y + by.y)
}

/// The point on segment `start → end` at most `max_len` away from `start`.
///
/// Returns `end` when the segment is already short enough and `start` when
/// it has no length.
#[must_use]
pub fn calc_endpoint(start: Point, end: Point, max_len: f64) -> Point {
    let len = distance(start, end);
    if len == 0.0 {
        return start;
    }
    if len <= max_len {
        return end;
    }
    let scale = max_len / len;
    Point::new(start.x + (end.x - start.x) * scale, start.y + (end.y - start.y) * scale)
}

/// Euclidean remainder; always in `[0, m)` for positive `m`. Returns 0 for `m == 0`.
#[must_use]
pub fn modulo(n: i64, m: i64) -> i64 {
    if m == 0 {
        return 0;
    }
    n.rem_euclid(m)
}

/// Rotate an offset by a quarter-turn multiple, clockwise in screen space.
#[must_use]
pub fn rotate_offset(v: Point, rotation: Rotation) -> Point {
    match rotation {
        Rotation::North => v,
        Rotation::East => Point::new(-v.y, v.x),
        Rotation::South => Point::new(-v.x, -v.y),
        Rotation::West => Point::new(v.y, -v.x),
    }
}

/// Top-left corner of the grid cell containing `p`.
#[must_use]
pub fn snap_to_grid(p: Point) -> Point {
    Point::new((p.x / BLOCK_SIZE).floor() * BLOCK_SIZE, (p.y / BLOCK_SIZE).floor() * BLOCK_SIZE)
}

/// Centre of the grid cell whose top-left corner is `corner`.
#[must_use]
pub fn cell_center(corner: Point) -> Point {
    let half = BLOCK_SIZE / 2.0;
    Point::new(corner.x + half, corner.y + half)
}

/// The aim lines for a shot from `ball` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimLines {
    /// Endpoint of the clamped, unrotated aim.
    pub guide: Point,
    /// Endpoint after the rotation modifier.
    pub shot: Point,
}

impl AimLines {
    /// Relative offset the shot line describes.
    #[must_use]
    pub fn shot_offset(&self, ball: Point) -> Point {
        offset(ball, self.shot)
    }
}

/// Clamp the aim at `max_len` and apply `rotation` around the ball.
#[must_use]
pub fn aim_lines(ball: Point, target: Point, rotation: Rotation, max_len: f64) -> AimLines {
    let guide = calc_endpoint(ball, target, max_len);
    let shot = translate(ball, rotate_offset(offset(ball, guide), rotation));
    AimLines { guide, shot }
}
