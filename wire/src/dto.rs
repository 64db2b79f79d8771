//! Compact map transport form.
//!
//! On the wire a map's tiles are a column-major grid of strings,
//! `tiles[column][row] = "ground,groundRotation,structure,structureRotation"`,
//! each part a small integer code. [`encode`] and [`decode`] convert between
//! that grid and the expanded [`GameMap`] tile list.

#[cfg(test)]
#[path = "dto_test.rs"]
mod dto_test;

use serde::{Deserialize, Serialize};

use crate::CodecError;
use crate::map::{GameMap, Ground, GroundType, Point, Rotation, Structure, StructureType, Tile};

/// Transport form of a [`GameMap`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameMapDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub creator: String,
    pub tiles: Vec<Vec<String>>,
}

/// Largest column or row count [`encode`] will lay out.
pub const MAX_GRID_SPAN: usize = 256;

/// Encode `map` into its column-major DTO.
///
/// The order of `map.tiles` does not matter; the grid is rebuilt from each
/// tile's position.
///
/// # Errors
///
/// [`CodecError::Misaligned`] for a position off the block grid,
/// [`CodecError::OutOfRange`] for a cell at or past [`MAX_GRID_SPAN`],
/// [`CodecError::DuplicateTile`] when two tiles share a cell, and
/// [`CodecError::MissingTile`] when the tiles do not cover a full rectangle.
pub fn encode(map: &GameMap) -> Result<GameMapDto, CodecError> {
    let mut cells = Vec::with_capacity(map.tiles.len());
    for tile in &map.tiles {
        let (column, row) = tile
            .pos
            .cell()
            .ok_or(CodecError::Misaligned { x: tile.pos.x, y: tile.pos.y })?;
        if column >= MAX_GRID_SPAN || row >= MAX_GRID_SPAN {
            return Err(CodecError::OutOfRange { column, row, max: MAX_GRID_SPAN });
        }
        cells.push((column, row, tile));
    }

    let columns = cells.iter().map(|(column, _, _)| column + 1).max().unwrap_or(0);
    let rows = cells.iter().map(|(_, row, _)| row + 1).max().unwrap_or(0);

    let mut grid: Vec<Vec<Option<String>>> = vec![vec![None; rows]; columns];
    for (column, row, tile) in cells {
        let slot = &mut grid[column][row];
        if slot.is_some() {
            return Err(CodecError::DuplicateTile { column, row });
        }
        *slot = Some(encode_cell(tile));
    }

    let mut tiles = Vec::with_capacity(columns);
    for (column, cells) in grid.into_iter().enumerate() {
        let mut out = Vec::with_capacity(rows);
        for (row, cell) in cells.into_iter().enumerate() {
            out.push(cell.ok_or(CodecError::MissingTile { column, row })?);
        }
        tiles.push(out);
    }

    Ok(GameMapDto {
        id: map.id.clone(),
        name: map.name.clone(),
        creator: map.creator.clone(),
        tiles,
    })
}

/// Decode a DTO into a map whose tiles are in column-major order.
///
/// # Errors
///
/// [`CodecError::RaggedGrid`] when columns differ in length and
/// [`CodecError::InvalidCell`] for a cell that is not four known codes.
pub fn decode(dto: &GameMapDto) -> Result<GameMap, CodecError> {
    let expected = dto.tiles.first().map_or(0, Vec::len);
    let mut tiles = Vec::with_capacity(dto.tiles.len() * expected);

    for (column, cells) in dto.tiles.iter().enumerate() {
        if cells.len() != expected {
            return Err(CodecError::RaggedGrid { column, len: cells.len(), expected });
        }
        for (row, cell) in cells.iter().enumerate() {
            let (ground, structure) = decode_cell(cell).ok_or_else(|| CodecError::InvalidCell {
                column,
                row,
                cell: cell.clone(),
            })?;
            tiles.push(Tile { pos: Point::from_cell(column, row), ground, structure });
        }
    }

    Ok(GameMap {
        id: dto.id.clone(),
        name: dto.name.clone(),
        creator: dto.creator.clone(),
        tiles,
        ..GameMap::default()
    })
}

fn encode_cell(tile: &Tile) -> String {
    format!(
        "{},{},{},{}",
        tile.ground.kind.code(),
        tile.ground.rotation.code(),
        tile.structure.kind.code(),
        tile.structure.rotation.code(),
    )
}

fn decode_cell(cell: &str) -> Option<(Ground, Structure)> {
    let mut codes = cell.split(',').map(|part| part.trim().parse::<i64>());
    let mut next = || -> Option<i64> {
        match codes.next() {
            Some(Ok(code)) => Some(code),
            _ => None,
        }
    };

    let ground_kind = GroundType::from_code(next()?);
    let ground_rotation = Rotation::from_code(next()?);
    let structure_kind = StructureType::from_code(next()?);
    let structure_rotation = Rotation::from_code(next()?);
    if codes.next().is_some() {
        return None;
    }

    match (ground_kind, ground_rotation, structure_kind, structure_rotation) {
        (Ok(g), Ok(gr), Ok(s), Ok(sr)) => Some((Ground::new(g, gr), Structure::new(s, sr))),
        _ => None,
    }
}

impl GameMap {
    /// Encode into the transport form. See [`encode`].
    ///
    /// # Errors
    ///
    /// Same as [`encode`].
    pub fn to_dto(&self) -> Result<GameMapDto, CodecError> {
        encode(self)
    }

    /// Decode from the transport form. See [`decode`].
    ///
    /// # Errors
    ///
    /// Same as [`decode`].
    pub fn from_dto(dto: &GameMapDto) -> Result<Self, CodecError> {
        decode(dto)
    }
}
