//! Starting layouts for a new map, in column-major order.

#[cfg(test)]
#[path = "templates_test.rs"]
mod templates_test;

use wire::map::{GRID_COLUMNS, GRID_ROWS, Point, Rotation, Structure, StructureType, Tile};

/// Tee cell of the bordered template.
pub const TEMPLATE_START: (usize, usize) = (2, 12);
/// Cup cell of the bordered template.
pub const TEMPLATE_HOLE: (usize, usize) = (46, 12);

/// Every cell grass, nothing built.
#[must_use]
pub fn empty() -> Vec<Tile> {
    grid(|_, _| StructureType::None)
}

/// Walls around the outer ring with a tee on the left and the cup on the right.
#[must_use]
pub fn bordered() -> Vec<Tile> {
    grid(|column, row| {
        if (column, row) == TEMPLATE_START {
            StructureType::Start
        } else if (column, row) == TEMPLATE_HOLE {
            StructureType::Hole
        } else if column == 0 || row == 0 || column == GRID_COLUMNS - 1 || row == GRID_ROWS - 1 {
            StructureType::Wall
        } else {
            StructureType::None
        }
    })
}

/// Look up a template by name.
#[must_use]
pub fn by_name(name: &str) -> Option<Vec<Tile>> {
    match name {
        "empty" => Some(empty()),
        "bordered" | "borders" => Some(bordered()),
        _ => None,
    }
}

fn grid(structure_at: impl Fn(usize, usize) -> StructureType) -> Vec<Tile> {
    (0..GRID_COLUMNS)
        .flat_map(|column| (0..GRID_ROWS).map(move |row| (column, row)))
        .map(|(column, row)| {
            Tile::new(Point::from_cell(column, row))
                .with_structure(Structure::new(structure_at(column, row), Rotation::North))
        })
        .collect()
}
