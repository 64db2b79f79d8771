//! Turn-gated shot input and the aiming overlay.
//!
//! [`ShotEngine`] turns pointer gestures into `SHOT` events. A mouse aims
//! and fires on press; touch and pen pull back from a drag anchor and fire
//! on release. The secondary button cycles a rotation modifier that mirrors
//! the shot around the ball. Every emit re-checks the turn, so a drag that
//! outlives the turn never fires.

#[cfg(test)]
#[path = "shot_test.rs"]
mod shot_test;

use std::collections::VecDeque;

use serde::Serialize;
use wire::event::{ClientEvent, PlayerId};
use wire::map::Rotation;

use crate::consts::{
    AIM_LINE_WIDTH, CURSOR_LINE_WIDTH, EFFECT_DURATION_MS, GAME_HEIGHT, GAME_WIDTH, GUIDE_DASH, HALF_BLOCK,
    HEADING_FONT, INK, LINE_START_GAP, MAX_LINE_LEN, STATUS_BASELINE, STATUS_FONT,
};
use crate::geometry::{Point, aim_lines, calc_endpoint, offset, rotate_offset, translate};
use crate::input::{Button, PointerInput};
use crate::paint::{PaintError, Painter, Stroke, TextAlign, TextStyle, crosshair, line};
use crate::sprite::Ball;
use crate::surface::{FrameInfo, Layer, LoopMode};

/// Actions returned from pointer handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum ShotAction {
    /// Send this event to the server.
    Shot(ClientEvent),
    /// The rotation modifier changed.
    Rotated(Rotation),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchDrag {
    start: Point,
    end: Point,
}

#[derive(Debug, Clone, PartialEq)]
struct Effect {
    label: String,
    expires_at_ms: f64,
}

/// Events per second over a rolling one-second window.
#[derive(Debug, Clone, Default)]
pub struct RateCounter {
    stamps: VecDeque<f64>,
}

impl RateCounter {
    const WINDOW_MS: f64 = 1000.0;

    pub fn add(&mut self, now_ms: f64) {
        self.stamps.push_back(now_ms);
        self.expire(now_ms);
    }

    #[must_use]
    pub fn value(&self) -> usize {
        self.stamps.len()
    }

    fn expire(&mut self, now_ms: f64) {
        while self.stamps.front().is_some_and(|&t| now_ms - t >= Self::WINDOW_MS) {
            self.stamps.pop_front();
        }
    }
}

/// Snapshot for a host diagnostics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotDebug {
    pub player_id: Option<PlayerId>,
    pub has_turn: bool,
    pub rotation: Rotation,
    pub balls: Vec<Ball>,
}

/// Shot input state for the local player.
#[derive(Debug, Clone, Default)]
pub struct ShotEngine {
    player_id: Option<PlayerId>,
    has_turn: bool,
    balls: Vec<Ball>,
    rotation: Rotation,
    drag: Option<TouchDrag>,
    pointer: Option<Point>,
    effect: Option<Effect>,
    heading: Option<String>,
    fps: RateCounter,
    ticks: RateCounter,
}

impl ShotEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    pub fn set_player_id(&mut self, player_id: PlayerId) {
        self.player_id = Some(player_id);
    }

    pub fn set_has_turn(&mut self, has_turn: bool) {
        self.has_turn = has_turn;
    }

    /// Replace the ball list and count it as one server tick.
    pub fn set_balls(&mut self, balls: Vec<Ball>, now_ms: f64) {
        self.balls = balls;
        self.ticks.add(now_ms);
    }

    pub fn set_heading(&mut self, heading: Option<String>) {
        self.heading = heading;
    }

    /// Show `label` in the status line for [`EFFECT_DURATION_MS`].
    pub fn trigger_effect(&mut self, label: &str, now_ms: f64) {
        self.effect = Some(Effect { label: label.to_owned(), expires_at_ms: now_ms + f64::from(EFFECT_DURATION_MS) });
    }

    // --- Queries ---

    #[must_use]
    pub fn has_turn(&self) -> bool {
        self.has_turn
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// The local player's ball, if present.
    #[must_use]
    pub fn ball(&self) -> Option<&Ball> {
        let id = self.player_id?;
        self.balls.iter().find(|ball| ball.id == id)
    }

    /// Active effect label at `now_ms`.
    #[must_use]
    pub fn effect(&self, now_ms: f64) -> Option<&str> {
        self.effect.as_ref().filter(|e| now_ms < e.expires_at_ms).map(|e| e.label.as_str())
    }

    #[must_use]
    pub fn debug(&self) -> ShotDebug {
        ShotDebug {
            player_id: self.player_id,
            has_turn: self.has_turn,
            rotation: self.rotation,
            balls: self.balls.clone(),
        }
    }

    fn can_shoot(&self) -> Option<Point> {
        if !self.has_turn {
            return None;
        }
        self.ball().map(Ball::center)
    }

    // --- Pointer handlers ---

    pub fn on_pointer_down(&mut self, input: PointerInput, now_ms: f64) -> Vec<ShotAction> {
        self.pointer = Some(input.at);

        match input.button {
            Button::Secondary => {
                self.rotation = self.rotation.next();
                return vec![ShotAction::Rotated(self.rotation)];
            }
            Button::Middle => return Vec::new(),
            Button::Primary => {}
        }

        let Some(ball) = self.can_shoot() else {
            return Vec::new();
        };

        if input.kind.drags_to_aim() {
            self.drag = Some(TouchDrag { start: input.at, end: input.at });
            return Vec::new();
        }

        let aim = aim_lines(ball, input.at, self.rotation, MAX_LINE_LEN);
        self.try_shot(aim.shot_offset(ball), now_ms).into_iter().collect()
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) {
        self.pointer = Some(input.at);
        if let Some(drag) = &mut self.drag {
            drag.end = input.at;
        }
    }

    pub fn on_pointer_up(&mut self, input: PointerInput, now_ms: f64) -> Vec<ShotAction> {
        if !input.kind.drags_to_aim() {
            return Vec::new();
        }
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        self.try_shot(touch_offset(drag), now_ms).into_iter().collect()
    }

    /// Emit a shot with relative offset `shot`, if the turn still allows it.
    fn try_shot(&mut self, shot: Point, now_ms: f64) -> Option<ShotAction> {
        self.can_shoot()?;
        if shot == Point::default() {
            return None;
        }

        self.has_turn = false;
        self.rotation = Rotation::North;
        self.drag = None;
        self.trigger_effect("SHOT", now_ms);
        log::debug!("shot ({}, {})", shot.x, shot.y);
        Some(ShotAction::Shot(ClientEvent::Shot { x: shot.x, y: shot.y }))
    }

    // --- Rendering ---

    fn draw_aim(&self, painter: &mut dyn Painter, ball: Point, pointer: Point) -> Result<(), PaintError> {
        if let Some(drag) = self.drag {
            return draw_line_from_ball(painter, ball, translate(ball, touch_offset(drag)), &[]);
        }

        let aim = aim_lines(ball, pointer, self.rotation, MAX_LINE_LEN);
        if self.rotation != Rotation::North {
            draw_line_from_ball(painter, ball, aim.guide, &GUIDE_DASH)?;
        }
        draw_line_from_ball(painter, ball, aim.shot, &[])
    }

    fn status_line(&self, frame: FrameInfo) -> String {
        let (name, shots) = self.ball().map_or(("", 0), |ball| (ball.name.as_str(), ball.shot_count));
        let (x, y) = self.pointer.map_or((0.0, 0.0), |p| (p.x.round(), p.y.round()));
        let mut status = format!(
            "name: {name}, shots: {shots}, x: {x}, y: {y}, fps: {}, tick: {}",
            self.fps.value(),
            self.ticks.value()
        );
        if let Some(effect) = self.effect(frame.now_ms) {
            status.push_str(", effect: ");
            status.push_str(effect);
        }
        status
    }
}

impl Layer for ShotEngine {
    fn loop_mode(&self) -> LoopMode {
        LoopMode::Continuous
    }

    fn render(&mut self, painter: &mut dyn Painter, frame: FrameInfo) -> Result<(), PaintError> {
        self.fps.add(frame.now_ms);
        self.ticks.expire(frame.now_ms);

        if let (Some(ball), Some(pointer)) = (self.can_shoot(), self.pointer) {
            self.draw_aim(painter, ball, pointer)?;
        }

        if let Some(pointer) = self.pointer {
            painter.stroke(&crosshair(pointer, HALF_BLOCK), Stroke::solid(INK, CURSOR_LINE_WIDTH))?;
        }

        let color = self.ball().map_or(INK, |ball| ball.color);
        let status = self.status_line(frame);
        painter.text(
            &status,
            Point::new(HALF_BLOCK, STATUS_BASELINE),
            TextStyle { font: STATUS_FONT, color, align: TextAlign::Left },
        )?;

        if let Some(heading) = &self.heading {
            painter.text(
                heading,
                Point::new(GAME_WIDTH / 2.0, GAME_HEIGHT / 2.0),
                TextStyle { font: HEADING_FONT, color: INK, align: TextAlign::Center },
            )?;
        }
        Ok(())
    }
}

/// Shot offset for a touch drag: clamped, then turned around so the gesture
/// pulls back like a slingshot.
fn touch_offset(drag: TouchDrag) -> Point {
    let end = calc_endpoint(drag.start, drag.end, MAX_LINE_LEN);
    rotate_offset(offset(drag.start, end), Rotation::South)
}

fn draw_line_from_ball(
    painter: &mut dyn Painter,
    ball: Point,
    end: Point,
    dash: &'static [f64],
) -> Result<(), PaintError> {
    let start = calc_endpoint(ball, end, LINE_START_GAP);
    painter.stroke(&line(start, end), Stroke { color: INK, width: AIM_LINE_WIDTH, dash })
}
