//! The editor page's map under construction: tiles with undo/redo, the
//! palette selection, and its keyboard and wheel bindings.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use wire::map::{GameMap, Tile};

use crate::editor::{EditorState, TilePatch};
use crate::history::HistoryBuffer;
use crate::input::{Key, Modifiers, WheelDelta};
use crate::storage::{IdentityStore, KeyValueStore, StorageError};
use crate::templates;

/// What a key or wheel event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChange {
    /// The tile list changed; redraw the map and persist.
    Tiles,
    /// The palette selection changed; push it to the editor controller.
    Selection,
}

#[derive(Debug, Clone)]
pub struct MapDraft {
    id: String,
    history: HistoryBuffer<Vec<Tile>>,
    state: EditorState,
}

impl MapDraft {
    /// A fresh draft seeded from the bordered template.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self::from_tiles(id, templates::bordered())
    }

    #[must_use]
    pub fn from_tiles(id: &str, tiles: Vec<Tile>) -> Self {
        Self { id: id.to_owned(), history: HistoryBuffer::new(tiles), state: EditorState::default() }
    }

    /// Resume editing an existing map.
    #[must_use]
    pub fn from_game_map(map: GameMap) -> Self {
        let mut draft = Self::from_tiles(&map.id, map.tiles);
        draft.state.map_name = map.name;
        draft.state.creator = map.creator;
        draft
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        self.history.state()
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn set_state(&mut self, state: EditorState) {
        self.state = state;
    }

    #[must_use]
    pub fn history(&self) -> &HistoryBuffer<Vec<Tile>> {
        &self.history
    }

    /// Merge `patch` into the tile at its position and record the result.
    ///
    /// Returns whether a tile matched. A patch for a position outside the
    /// map is ignored.
    pub fn apply_patch(&mut self, patch: &TilePatch) -> bool {
        let pos = patch.pos();
        let Some(index) = self.tiles().iter().position(|tile| tile.pos == pos) else {
            log::debug!("patch at ({}, {}) matches no tile", pos.x, pos.y);
            return false;
        };
        let mut tiles = self.tiles().to_vec();
        patch.apply(&mut tiles[index]);
        self.history.set_state(tiles);
        true
    }

    pub fn undo(&mut self) {
        self.history.go_back(1);
    }

    pub fn redo(&mut self) {
        self.history.go_forward(1);
    }

    /// Start over from `tiles`, discarding history.
    pub fn reset(&mut self, tiles: Vec<Tile>) {
        self.history.reset_state(tiles);
    }

    // --- Bindings ---

    pub fn on_key(&mut self, key: &Key, modifiers: Modifiers) -> Option<DraftChange> {
        if key.is_letter('r') && !modifiers.command() {
            let clockwise = modifiers.shift || key.0 == "R";
            self.state.rotation = if clockwise { self.state.rotation.next() } else { self.state.rotation.prev() };
            return Some(DraftChange::Selection);
        }
        if key.is_letter('z') && modifiers.command() {
            self.undo();
            return Some(DraftChange::Tiles);
        }
        if key.is_letter('y') && modifiers.command() {
            self.redo();
            return Some(DraftChange::Tiles);
        }
        match key.0.as_str() {
            "ArrowUp" => self.state.step_element(false),
            "ArrowDown" => self.state.step_element(true),
            "ArrowLeft" | "ArrowRight" => self.state.toggle_mode(),
            _ => return None,
        }
        Some(DraftChange::Selection)
    }

    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> DraftChange {
        if modifiers.shift {
            self.state.toggle_mode();
        } else {
            self.state.step_element(delta.dy > 0.0);
        }
        DraftChange::Selection
    }

    // --- Output ---

    /// Snapshot as a map ready for submission.
    #[must_use]
    pub fn to_game_map(&self) -> GameMap {
        GameMap {
            id: self.id.clone(),
            name: self.state.map_name.clone(),
            creator: self.state.creator.clone(),
            ..GameMap::from_tiles(self.tiles().to_vec())
        }
    }

    /// # Errors
    /// Storage write failure.
    pub fn save<S: KeyValueStore>(&self, store: &mut IdentityStore<S>) -> Result<(), StorageError> {
        store.save_draft(&self.id, &self.to_game_map())
    }

    /// The stored draft for `map_id`, if one exists.
    ///
    /// # Errors
    /// The stored draft is corrupt.
    pub fn load<S: KeyValueStore>(store: &IdentityStore<S>, map_id: &str) -> Result<Option<Self>, StorageError> {
        Ok(store.load_draft(map_id)?.map(Self::from_game_map))
    }
}
