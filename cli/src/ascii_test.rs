use canvas::templates::{self, TEMPLATE_HOLE, TEMPLATE_START};
use wire::map::{GRID_COLUMNS, GRID_ROWS};
use wire::{GameMap, Ground, GroundType, Point, Rotation, Structure, StructureType, Tile};

use super::*;

fn lines(map: &GameMap) -> Vec<Vec<char>> {
    render(map).lines().map(|line| line.chars().collect()).collect()
}

#[test]
fn bordered_template_draws_walls_tee_and_cup() {
    let grid = lines(&GameMap::from_tiles(templates::bordered()));

    assert_eq!(grid.len(), GRID_ROWS);
    assert!(grid.iter().all(|row| row.len() == GRID_COLUMNS));
    assert!(grid[0].iter().all(|&c| c == '#'));
    assert!(grid[GRID_ROWS - 1].iter().all(|&c| c == '#'));
    assert_eq!(grid[TEMPLATE_START.1][TEMPLATE_START.0], 'S');
    assert_eq!(grid[TEMPLATE_HOLE.1][TEMPLATE_HOLE.0], 'H');
    assert_eq!(grid[5][5], '.');
}

#[test]
fn structure_wins_over_ground() {
    let tile = Tile::new(Point::default())
        .with_ground(Ground::new(GroundType::Water, Rotation::North))
        .with_structure(Structure::new(StructureType::Portal, Rotation::East));
    assert_eq!(glyph(&tile), '@');

    let water = Tile::new(Point::default()).with_ground(Ground::new(GroundType::Water, Rotation::North));
    assert_eq!(glyph(&water), '~');
}

#[test]
fn missing_and_off_grid_tiles_leave_blanks() {
    let map = GameMap::from_tiles(vec![
        Tile::new(Point::from_cell(1, 0)).with_structure(Structure::new(StructureType::Circle, Rotation::North)),
        Tile::new(Point::from_cell(GRID_COLUMNS + 3, 0)),
        Tile::new(Point::new(50.0, 50.0)),
    ]);

    let grid = lines(&map);

    assert_eq!(grid[0][0], ' ');
    assert_eq!(grid[0][1], 'o');
    assert!(grid[1].iter().all(|&c| c == ' '));
}
