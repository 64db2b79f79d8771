//! In-memory [`Painter`] that records every call, for tests.

use crate::geometry::Point;
use crate::paint::{Fill, PaintError, Painter, PathOp, Shadow, Stroke, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Save,
    Restore,
    Clear,
    Translate(Point),
    Rotate(f64),
    Shadow(Option<Shadow>),
    Fill { path: Vec<PathOp>, fill: Fill, shadowed: bool, origin: Point },
    Stroke { path: Vec<PathOp>, stroke: Stroke, shadowed: bool, origin: Point },
    Text { text: String, at: Point, style: TextStyle },
}

#[derive(Debug, Clone, Copy, Default)]
struct State {
    shadowed: bool,
    origin: Point,
}

/// Records calls and tracks save depth, shadow state, and the accumulated
/// translation (rotation is recorded but not applied to `origin`).
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    stack: Vec<State>,
    state: State,
    pub max_depth: usize,
    pub unbalanced_restores: usize,
    pub fail_on_text: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn fills(&self) -> Vec<&Call> {
        self.calls.iter().filter(|call| matches!(call, Call::Fill { .. })).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn strokes(&self) -> Vec<&Call> {
        self.calls.iter().filter(|call| matches!(call, Call::Stroke { .. })).collect()
    }
}

impl Painter for Recorder {
    fn save(&mut self) {
        self.stack.push(self.state);
        self.max_depth = self.max_depth.max(self.stack.len());
        self.calls.push(Call::Save);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => self.unbalanced_restores += 1,
        }
        self.calls.push(Call::Restore);
    }

    fn clear(&mut self) {
        self.state = State::default();
        self.calls.push(Call::Clear);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), PaintError> {
        self.state.origin = Point::new(self.state.origin.x + x, self.state.origin.y + y);
        self.calls.push(Call::Translate(Point::new(x, y)));
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<(), PaintError> {
        self.calls.push(Call::Rotate(angle));
        Ok(())
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadowed = shadow.is_some();
        self.calls.push(Call::Shadow(shadow));
    }

    fn fill(&mut self, path: &[PathOp], fill: Fill) -> Result<(), PaintError> {
        self.calls.push(Call::Fill {
            path: path.to_vec(),
            fill,
            shadowed: self.state.shadowed,
            origin: self.state.origin,
        });
        Ok(())
    }

    fn stroke(&mut self, path: &[PathOp], stroke: Stroke) -> Result<(), PaintError> {
        self.calls.push(Call::Stroke {
            path: path.to_vec(),
            stroke,
            shadowed: self.state.shadowed,
            origin: self.state.origin,
        });
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle) -> Result<(), PaintError> {
        if self.fail_on_text {
            return Err(PaintError::Backend("text".to_owned()));
        }
        self.calls.push(Call::Text { text: text.to_owned(), at, style });
        Ok(())
    }
}
