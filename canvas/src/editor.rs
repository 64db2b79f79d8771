//! Map editor input: paint and erase tiles under the pointer, with a live
//! preview of the element about to be placed.
//!
//! The controller never mutates a map. It emits [`TilePatch`]es and the
//! host (see [`crate::draft::MapDraft`]) merges them into its tile list.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use serde::{Deserialize, Serialize};
use wire::map::{Ground, GroundType, Rotation, Structure, StructureType, Tile};

use crate::consts::{BLOCK_SIZE, CURSOR_LINE_WIDTH, ERASER, HALF_BLOCK, INK, STATUS_BASELINE, STATUS_FONT};
use crate::geometry::{Point, cell_center, snap_to_grid};
use crate::input::{Button, PointerInput};
use crate::paint::{Fill, PaintError, Painter, Stroke, TextAlign, TextStyle, crosshair, square};
use crate::surface::{FrameInfo, Layer};
use crate::tiles::{draw_ground, draw_structure};

/// Which half of a tile the editor paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Structure,
    Ground,
}

impl EditMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Structure => Self::Ground,
            Self::Ground => Self::Structure,
        }
    }
}

/// Palette selection pushed from the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorState {
    pub mode: EditMode,
    /// Index into [`StructureType::ALL`].
    pub structure_idx: usize,
    /// Index into [`GroundType::ALL`].
    pub ground_idx: usize,
    pub rotation: Rotation,
    pub map_name: String,
    pub creator: String,
}

impl EditorState {
    #[must_use]
    pub fn selected_structure(&self) -> StructureType {
        StructureType::ALL[self.structure_idx % StructureType::ALL.len()]
    }

    #[must_use]
    pub fn selected_ground(&self) -> GroundType {
        GroundType::ALL[self.ground_idx % GroundType::ALL.len()]
    }

    /// Step the active palette by one, wrapping at either end.
    pub fn step_element(&mut self, forward: bool) {
        match self.mode {
            EditMode::Structure => self.structure_idx = cycle(self.structure_idx, StructureType::ALL.len(), forward),
            EditMode::Ground => self.ground_idx = cycle(self.ground_idx, GroundType::ALL.len(), forward),
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    let index = index % len;
    if forward { (index + 1) % len } else { (index + len - 1) % len }
}

/// A change to one tile: only the half matching the edit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TilePatch {
    Structure { pos: Point, structure: Structure },
    Ground { pos: Point, ground: Ground },
}

impl TilePatch {
    #[must_use]
    pub fn pos(&self) -> Point {
        match self {
            Self::Structure { pos, .. } | Self::Ground { pos, .. } => *pos,
        }
    }

    /// Overwrite the patched half of `tile`.
    pub fn apply(&self, tile: &mut Tile) {
        match *self {
            Self::Structure { structure, .. } => tile.structure = structure,
            Self::Ground { ground, .. } => tile.ground = ground,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragStatus {
    Insert,
    Delete,
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    Patch(TilePatch),
    RenderNeeded,
}

/// Snapshot for a host diagnostics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDebug {
    pub state: EditorState,
    pub hovered: Option<Point>,
    pub drag: Option<DragStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct EditController {
    state: EditorState,
    pointer: Option<Point>,
    hovered: Option<Point>,
    drag: Option<DragStatus>,
}

impl EditController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, state: EditorState) {
        self.state = state;
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Top-left corner of the tile under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<Point> {
        self.hovered
    }

    #[must_use]
    pub fn drag(&self) -> Option<DragStatus> {
        self.drag
    }

    #[must_use]
    pub fn debug(&self) -> EditDebug {
        EditDebug { state: self.state.clone(), hovered: self.hovered, drag: self.drag }
    }

    fn track(&mut self, at: Point) -> Point {
        self.pointer = Some(at);
        let tile = snap_to_grid(at);
        self.hovered = Some(tile);
        tile
    }

    /// The patch the current drag would apply at `pos`.
    fn patch(&self, pos: Point) -> TilePatch {
        let erase = self.drag == Some(DragStatus::Delete);
        match self.state.mode {
            EditMode::Structure => {
                let structure = if erase {
                    Structure::default()
                } else {
                    Structure::new(self.state.selected_structure(), self.state.rotation)
                };
                TilePatch::Structure { pos, structure }
            }
            EditMode::Ground => {
                let ground =
                    if erase { Ground::default() } else { Ground::new(self.state.selected_ground(), self.state.rotation) };
                TilePatch::Ground { pos, ground }
            }
        }
    }

    // --- Pointer handlers ---

    pub fn on_pointer_down(&mut self, input: PointerInput) -> Vec<EditAction> {
        let tile = self.track(input.at);
        self.drag = match input.button {
            Button::Primary => Some(DragStatus::Insert),
            Button::Secondary => Some(DragStatus::Delete),
            Button::Middle => return vec![EditAction::RenderNeeded],
        };
        vec![EditAction::Patch(self.patch(tile)), EditAction::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) -> Vec<EditAction> {
        let previous = self.hovered;
        let tile = self.track(input.at);
        if self.drag.is_some() && previous != Some(tile) {
            return vec![EditAction::Patch(self.patch(tile)), EditAction::RenderNeeded];
        }
        vec![EditAction::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, _input: PointerInput) -> Vec<EditAction> {
        self.drag = None;
        vec![EditAction::RenderNeeded]
    }

    // --- Rendering ---

    fn draw_preview(&self, painter: &mut dyn Painter, tile: Point) -> Result<(), PaintError> {
        let erasing = self.drag == Some(DragStatus::Delete)
            || (self.state.mode == EditMode::Structure && self.state.selected_structure() == StructureType::None);
        if erasing {
            let block = square(cell_center(tile), BLOCK_SIZE);
            painter.fill(&block, Fill::Solid(ERASER))?;
            return painter.stroke(&block, Stroke::solid(ERASER, CURSOR_LINE_WIDTH));
        }
        match self.state.mode {
            EditMode::Ground => draw_ground(painter, tile, Ground::new(self.state.selected_ground(), self.state.rotation)),
            EditMode::Structure => draw_structure(
                painter,
                tile,
                Structure::new(self.state.selected_structure(), self.state.rotation),
                true,
            ),
        }
    }
}

impl Layer for EditController {
    fn render(&mut self, painter: &mut dyn Painter, _frame: FrameInfo) -> Result<(), PaintError> {
        if let Some(tile) = self.hovered {
            self.draw_preview(painter, tile)?;
        }
        let Some(pointer) = self.pointer else {
            return Ok(());
        };
        painter.stroke(&crosshair(pointer, HALF_BLOCK), Stroke::solid(INK, CURSOR_LINE_WIDTH))?;
        painter.text(
            &format!("x: {}, y: {}", pointer.x.round(), pointer.y.round()),
            Point::new(HALF_BLOCK, STATUS_BASELINE),
            TextStyle { font: STATUS_FONT, color: INK, align: TextAlign::Left },
        )
    }
}
