//! Character-grid rendering of a course for terminals.

#[cfg(test)]
#[path = "ascii_test.rs"]
mod ascii_test;

use wire::map::{GRID_COLUMNS, GRID_ROWS};
use wire::{GameMap, GroundType, StructureType, Tile};

fn structure_glyph(kind: StructureType) -> Option<char> {
    match kind {
        StructureType::None => None,
        StructureType::Wall => Some('#'),
        StructureType::Circle => Some('o'),
        StructureType::Start => Some('S'),
        StructureType::Hole => Some('H'),
        StructureType::Wedge => Some('/'),
        StructureType::RoundedCorner => Some('('),
        StructureType::InvertedRoundedCorner => Some(')'),
        StructureType::Portal => Some('@'),
    }
}

fn ground_glyph(kind: GroundType) -> char {
    match kind {
        GroundType::Grass => '.',
        GroundType::Water => '~',
        GroundType::Gravel => ':',
        GroundType::GravelHeavy => '%',
        GroundType::Slope => '>',
        GroundType::SlopeDiagonal => '\\',
    }
}

/// Structure glyph if the tile has one, otherwise its ground.
#[must_use]
pub fn glyph(tile: &Tile) -> char {
    structure_glyph(tile.structure.kind).unwrap_or_else(|| ground_glyph(tile.ground.kind))
}

/// One line per grid row. Cells with no tile are blank; tiles off the grid are skipped.
#[must_use]
pub fn render(map: &GameMap) -> String {
    let mut grid = vec![vec![' '; GRID_COLUMNS]; GRID_ROWS];
    for tile in &map.tiles {
        let Some((column, row)) = tile.pos.cell() else {
            continue;
        };
        if let Some(cell) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
            *cell = glyph(tile);
        }
    }
    let mut out = String::with_capacity(GRID_ROWS * (GRID_COLUMNS + 1));
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}
