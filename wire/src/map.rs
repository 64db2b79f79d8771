//! Course model: points, rotations, tile cells, and whole maps.
//!
//! Positions are in logical game units. Every tile sits on a block-aligned
//! grid cell; `pos` is the cell's top-left corner.

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::CodecError;

// ── Grid ────────────────────────────────────────────────────────

/// Edge length of one grid cell in logical units.
pub const BLOCK_SIZE: f64 = 100.0;

/// Columns in the reference course.
pub const GRID_COLUMNS: usize = 49;

/// Rows in the reference course.
pub const GRID_ROWS: usize = 25;

/// A point in logical game space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point at grid cell (`column`, `row`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_cell(column: usize, row: usize) -> Self {
        Self::new(column as f64 * BLOCK_SIZE, row as f64 * BLOCK_SIZE)
    }

    /// The grid cell this point names, if it is block-aligned and non-negative.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell(self) -> Option<(usize, usize)> {
        let column = self.x / BLOCK_SIZE;
        let row = self.y / BLOCK_SIZE;
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }
        if column.fract() != 0.0 || row.fract() != 0.0 {
            return None;
        }
        Some((column as usize, row as usize))
    }
}

// ── Rotation ────────────────────────────────────────────────────

/// Quarter-turn orientation. Cyclic: `West.next()` is `North`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Rotation at a cyclic index; any integer maps onto the four variants.
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        match index.rem_euclid(4) {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    #[must_use]
    pub fn index(self) -> i64 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Clockwise successor.
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Counter-clockwise predecessor.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_index(self.index() - 1)
    }

    /// Canvas rotation angle in radians.
    #[must_use]
    pub fn angle(self) -> f64 {
        match self {
            Self::North => 0.0,
            Self::East => FRAC_PI_2,
            Self::South => PI,
            Self::West => -FRAC_PI_2,
        }
    }

    /// DTO code.
    #[must_use]
    pub fn code(self) -> i64 {
        self.index()
    }

    pub(crate) fn from_code(code: i64) -> Result<Self, CodecError> {
        match code {
            0..=3 => Ok(Self::from_index(code)),
            _ => Err(CodecError::InvalidCode { kind: "rotation", code }),
        }
    }
}

// ── Ground ──────────────────────────────────────────────────────

/// Floor cover of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroundType {
    #[default]
    Grass,
    Water,
    Gravel,
    GravelHeavy,
    Slope,
    SlopeDiagonal,
}

impl GroundType {
    /// Palette order used by the editor.
    pub const ALL: [Self; 6] = [
        Self::Grass,
        Self::Water,
        Self::Gravel,
        Self::GravelHeavy,
        Self::Slope,
        Self::SlopeDiagonal,
    ];

    /// Whether the rotation of this cover changes how it looks or plays.
    #[must_use]
    pub fn is_directional(self) -> bool {
        matches!(self, Self::Slope | Self::SlopeDiagonal)
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Grass => 0,
            Self::Water => 1,
            Self::Gravel => 2,
            Self::GravelHeavy => 3,
            Self::Slope => 4,
            Self::SlopeDiagonal => 5,
        }
    }

    pub(crate) fn from_code(code: i64) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(CodecError::InvalidCode { kind: "ground", code })
    }
}

/// Ground half of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ground {
    #[serde(rename = "type")]
    pub kind: GroundType,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Ground {
    #[must_use]
    pub fn new(kind: GroundType, rotation: Rotation) -> Self {
        Self { kind, rotation }
    }
}

// ── Structure ───────────────────────────────────────────────────

/// Obstacle or marker occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureType {
    #[default]
    None,
    Wall,
    Circle,
    Start,
    Hole,
    Wedge,
    RoundedCorner,
    InvertedRoundedCorner,
    Portal,
}

impl StructureType {
    /// Palette order used by the editor.
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::Wall,
        Self::Circle,
        Self::Start,
        Self::Hole,
        Self::Wedge,
        Self::RoundedCorner,
        Self::InvertedRoundedCorner,
        Self::Portal,
    ];

    /// Drawn beneath the balls.
    #[must_use]
    pub fn is_floor(self) -> bool {
        matches!(self, Self::Start | Self::Hole | Self::Portal)
    }

    /// Drawn above the balls, with a drop shadow.
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Self::Wall | Self::Circle | Self::Wedge | Self::RoundedCorner | Self::InvertedRoundedCorner
        )
    }

    /// Whether the rotation of this structure changes its shape.
    #[must_use]
    pub fn is_directional(self) -> bool {
        matches!(self, Self::Wedge | Self::RoundedCorner | Self::InvertedRoundedCorner)
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Wall => 1,
            Self::Circle => 2,
            Self::Start => 3,
            Self::Hole => 4,
            Self::Wedge => 5,
            Self::RoundedCorner => 6,
            Self::InvertedRoundedCorner => 7,
            Self::Portal => 8,
        }
    }

    pub(crate) fn from_code(code: i64) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(CodecError::InvalidCode { kind: "structure", code })
    }
}

/// Structure half of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Structure {
    #[serde(rename = "type")]
    pub kind: StructureType,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Structure {
    #[must_use]
    pub fn new(kind: StructureType, rotation: Rotation) -> Self {
        Self { kind, rotation }
    }
}

// ── Tile / map ──────────────────────────────────────────────────

/// One grid cell of a course.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub pos: Point,
    pub ground: Ground,
    pub structure: Structure,
}

impl Tile {
    /// A plain grass tile at `pos`.
    #[must_use]
    pub fn new(pos: Point) -> Self {
        Self { pos, ground: Ground::default(), structure: Structure::default() }
    }

    #[must_use]
    pub fn with_ground(mut self, ground: Ground) -> Self {
        self.ground = ground;
        self
    }

    #[must_use]
    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }
}

/// Aggregate rating of a map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub sum: f64,
    pub count: u64,
}

/// A complete course with its metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameMap {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub creator: String,
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub highscores: Vec<serde_json::Value>,
    #[serde(default)]
    pub stats: Stats,
}

impl GameMap {
    /// A map holding `tiles` and no metadata.
    #[must_use]
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles, ..Self::default() }
    }

    /// Index of the tile whose position equals `pos`.
    #[must_use]
    pub fn index_of(&self, pos: Point) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.pos == pos)
    }

    #[must_use]
    pub fn tile_at(&self, pos: Point) -> Option<&Tile> {
        self.index_of(pos).map(|index| &self.tiles[index])
    }

    /// The first tile carrying the given structure.
    #[must_use]
    pub fn find_structure(&self, kind: StructureType) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.structure.kind == kind)
    }
}
