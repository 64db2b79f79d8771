//! Ball sprites and the hole-in animation.

#[cfg(test)]
#[path = "sprite_test.rs"]
mod sprite_test;

use serde::Serialize;
use wire::event::{PlayerId, PlayerState};

use crate::consts::{BALL_RADIUS, HOLE_ANIMATION_FRAMES, HOLE_SPIN_DEG, PALETTE};
use crate::geometry::Point;
use crate::paint::{Fill, PaintError, Painter, circle, with_transform};
use crate::surface::{FrameInfo, Layer, LoopMode};
use crate::tiles::DROP_SHADOW;

/// A player's ball as drawn on the course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub color: &'static str,
    pub shot_count: i64,
}

impl Ball {
    #[must_use]
    pub fn from_state(state: &PlayerState) -> Self {
        Self {
            id: state.id,
            x: state.x,
            y: state.y,
            name: state.name.clone(),
            color: ball_color(state.id),
            shot_count: state.shot_count,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Deterministic colour for a player id.
#[must_use]
pub fn ball_color(id: PlayerId) -> &'static str {
    let len = PlayerId::try_from(PALETTE.len()).unwrap_or(1);
    let index = usize::try_from(id.rem_euclid(len)).unwrap_or(0);
    PALETTE[index % PALETTE.len()]
}

/// Balls from an `UPDATE`, sorted by id.
#[must_use]
pub fn balls_from_states(states: &[PlayerState]) -> Vec<Ball> {
    let mut balls: Vec<Ball> = states.iter().map(Ball::from_state).collect();
    balls.sort_by_key(|ball| ball.id);
    balls
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sinking {
    player_id: PlayerId,
    frame: u32,
    at: Point,
}

/// Continuous layer that draws every ball, the local player's last.
#[derive(Debug, Default)]
pub struct SpriteLayer {
    balls: Vec<Ball>,
    player_id: Option<PlayerId>,
    sinking: Option<Sinking>,
}

impl SpriteLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_player_id(&mut self, player_id: PlayerId) {
        self.player_id = Some(player_id);
    }

    /// Replace the ball list. A sunk ball reappears once it has moved.
    pub fn set_balls(&mut self, balls: Vec<Ball>) {
        if let Some(sinking) = self.sinking {
            let moved = balls
                .iter()
                .find(|ball| ball.id == sinking.player_id)
                .is_none_or(|ball| ball.center() != sinking.at);
            if moved {
                self.sinking = None;
            }
        }
        self.balls = balls;
    }

    #[must_use]
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Start the hole-in animation for `player_id` at its current position.
    pub fn start_hole_animation(&mut self, player_id: PlayerId) {
        let Some(ball) = self.balls.iter().find(|ball| ball.id == player_id) else {
            log::debug!("hole effect for unknown player {player_id}");
            return;
        };
        self.sinking = Some(Sinking { player_id, frame: 0, at: ball.center() });
    }

    #[must_use]
    pub fn is_sinking(&self, player_id: PlayerId) -> bool {
        self.sinking.is_some_and(|s| s.player_id == player_id)
    }

    /// Draw order: other players by id, then the local player.
    fn draw_order(&self) -> impl Iterator<Item = &Ball> {
        let local = self.player_id;
        let others = self.balls.iter().filter(move |ball| Some(ball.id) != local);
        let mine = self.balls.iter().filter(move |ball| Some(ball.id) == local);
        others.chain(mine)
    }
}

impl Layer for SpriteLayer {
    fn loop_mode(&self) -> LoopMode {
        LoopMode::Continuous
    }

    fn render(&mut self, painter: &mut dyn Painter, _frame: FrameInfo) -> Result<(), PaintError> {
        let sinking = self.sinking;
        for ball in self.draw_order() {
            match sinking {
                Some(s) if s.player_id == ball.id => {
                    if s.frame < HOLE_ANIMATION_FRAMES {
                        draw_sinking_ball(painter, ball, s.frame)?;
                    }
                }
                _ => draw_ball(painter, ball.center(), BALL_RADIUS, 0.0, ball.color)?,
            }
        }
        if let Some(s) = &mut self.sinking {
            s.frame = s.frame.saturating_add(1).min(HOLE_ANIMATION_FRAMES);
        }
        Ok(())
    }
}

fn draw_sinking_ball(painter: &mut dyn Painter, ball: &Ball, frame: u32) -> Result<(), PaintError> {
    let step = f64::from(frame);
    let radius = BALL_RADIUS - step * (BALL_RADIUS / f64::from(HOLE_ANIMATION_FRAMES));
    let angle = -(step * HOLE_SPIN_DEG).to_radians();
    draw_ball(painter, ball.center(), radius, angle, ball.color)
}

/// Draw one ball with its drop shadow.
///
/// # Errors
///
/// Propagates any drawing backend failure.
pub fn draw_ball(
    painter: &mut dyn Painter,
    center: Point,
    radius: f64,
    angle: f64,
    color: &'static str,
) -> Result<(), PaintError> {
    with_transform(painter, center, angle, |p| {
        p.set_shadow(Some(DROP_SHADOW));
        p.fill(&circle(Point::default(), radius), Fill::Solid(color))
    })
}
