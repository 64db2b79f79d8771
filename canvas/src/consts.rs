//! Shared numeric and colour constants for the canvas crate.

pub use wire::map::BLOCK_SIZE;

// ── Game space ──────────────────────────────────────────────────

/// Logical course width; every layer draws in these units.
pub const GAME_WIDTH: f64 = 4900.0;

/// Logical course height.
pub const GAME_HEIGHT: f64 = 2500.0;

/// Height-to-width aspect ratio of the course.
pub const RATIO: f64 = GAME_HEIGHT / GAME_WIDTH;

pub const HALF_BLOCK: f64 = BLOCK_SIZE / 2.0;

// ── Sprites ─────────────────────────────────────────────────────

pub const BALL_RADIUS: f64 = 50.0;

/// Radius of the round wall post.
pub const CIRCLE_RADIUS: f64 = 24.0;

/// Radius of the tee marker.
pub const START_RADIUS: f64 = 10.0;

pub const HOLE_ANIMATION_FRAMES: u32 = 60;

/// Spin per hole-animation frame, in degrees (counter-clockwise).
pub const HOLE_SPIN_DEG: f64 = 15.0;

/// Ball colours, indexed by `player_id % len`.
pub const PALETTE: [&str; 7] = ["red", "blue", "cyan", "green", "yellow", "orange", "maroon"];

// ── Shot ────────────────────────────────────────────────────────

/// Longest aim line; bounds shot power.
pub const MAX_LINE_LEN: f64 = 1000.0;

/// Gap left between the ball centre and the start of an aim line.
pub const LINE_START_GAP: f64 = BALL_RADIUS + 2.0;

/// Dash pattern of the raw guide line when a rotation modifier is active.
pub const GUIDE_DASH: [f64; 2] = [100.0, 40.0];

pub const EFFECT_DURATION_MS: u32 = 2000;

// ── Timing ──────────────────────────────────────────────────────

pub const SAVE_DEMO_DELAY_MS: u32 = 200;

pub const RESIZE_DEBOUNCE_MS: u32 = 100;

/// Margin kept free around the fitted canvas, in CSS pixels.
pub const SURFACE_MARGIN_PX: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

pub const HISTORY_MAX_MEMORY: usize = 20;

// ── Colours ─────────────────────────────────────────────────────

pub const WALL: &str = "#b8b8b8";
pub const WALL_BORDER: &str = "#ededed";
pub const HOLE: &str = "#000000";
pub const START: &str = "#fc0303";
pub const GRASS: &str = "#13a713";
pub const GRAVEL: &str = "#a5c400";
pub const GRAVEL_HEAVY: &str = "#a97200";
pub const WATER: &str = "#0002fd";
pub const SLOPE_NORTH: &str = "#34c42f";
pub const SLOPE_EAST: &str = "#176314";
pub const SLOPE_SOUTH: &str = "#187814";
pub const SLOPE_WEST: &str = "#30d42a";
pub const PORTAL_CENTER: &str = "black";
pub const PORTAL_RIM: &str = "orange";
pub const ERASER: &str = "#ffffff";
pub const INK: &str = "black";

// ── Shadow ──────────────────────────────────────────────────────

pub const SHADOW_COLOR: &str = "black";
pub const SHADOW_BLUR: f64 = 15.0;
pub const SHADOW_OFFSET: f64 = 5.0;

// ── Line widths ─────────────────────────────────────────────────

pub const WALL_LINE_WIDTH: f64 = 0.5;
pub const GROUND_LINE_WIDTH: f64 = 5.0;
pub const SLOPE_ARROW_WIDTH: f64 = 3.0;
pub const AIM_LINE_WIDTH: f64 = 6.0;
pub const CURSOR_LINE_WIDTH: f64 = 4.0;

// ── Text ────────────────────────────────────────────────────────

pub const STATUS_FONT: &str = "60px sans-serif";
pub const HEADING_FONT: &str = "200px sans-serif";

/// Baseline of the status line, in logical units from the top.
pub const STATUS_BASELINE: f64 = 80.0;
