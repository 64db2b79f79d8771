use super::*;

fn grid_map(columns: usize, rows: usize) -> GameMap {
    let mut tiles = Vec::new();
    for column in 0..columns {
        for row in 0..rows {
            tiles.push(Tile::new(Point::from_cell(column, row)));
        }
    }
    GameMap {
        id: "map-1".to_owned(),
        name: "Loop".to_owned(),
        creator: "ada".to_owned(),
        tiles,
        ..GameMap::default()
    }
}

#[test]
fn encode_writes_column_major_cells() {
    let mut map = grid_map(2, 3);
    map.tiles[4] = Tile::new(Point::from_cell(1, 1))
        .with_ground(Ground::new(GroundType::Slope, Rotation::South))
        .with_structure(Structure::new(StructureType::Wedge, Rotation::West));

    let dto = encode(&map).expect("encode");

    assert_eq!(dto.tiles.len(), 2);
    assert_eq!(dto.tiles[0], vec!["0,0,0,0", "0,0,0,0", "0,0,0,0"]);
    assert_eq!(dto.tiles[1][1], "4,2,5,3");
    assert_eq!(dto.id, "map-1");
    assert_eq!(dto.name, "Loop");
    assert_eq!(dto.creator, "ada");
}

#[test]
fn decode_restores_canonical_map() {
    let mut map = grid_map(3, 2);
    map.tiles[5] = map.tiles[5].with_structure(Structure::new(StructureType::Portal, Rotation::North));

    let decoded = decode(&encode(&map).expect("encode")).expect("decode");

    assert_eq!(decoded, map);
}

#[test]
fn encode_ignores_tile_list_order() {
    let map = grid_map(3, 3);
    let mut shuffled = map.clone();
    shuffled.tiles.reverse();

    assert_eq!(encode(&shuffled).expect("encode"), encode(&map).expect("encode"));
}

#[test]
fn decode_then_encode_preserves_dto() {
    let dto = GameMapDto {
        id: "x".to_owned(),
        name: String::new(),
        creator: String::new(),
        tiles: vec![
            vec!["1,0,1,0".to_owned(), "0,0,4,0".to_owned()],
            vec!["5,3,7,2".to_owned(), "2,0,3,0".to_owned()],
        ],
    };

    let map = decode(&dto).expect("decode");

    assert_eq!(map.tiles[2].pos, Point::new(100.0, 0.0));
    assert_eq!(map.tiles[2].ground, Ground::new(GroundType::SlopeDiagonal, Rotation::West));
    assert_eq!(encode(&map).expect("encode"), dto);
}

#[test]
fn encode_rejects_duplicate_positions() {
    let mut map = grid_map(2, 2);
    map.tiles.push(Tile::new(Point::from_cell(1, 0)));

    let err = encode(&map).expect_err("duplicate");

    assert!(matches!(err, CodecError::DuplicateTile { column: 1, row: 0 }));
}

#[test]
fn encode_rejects_cells_past_the_grid_limit() {
    let mut map = grid_map(1, 1);
    map.tiles.push(Tile::new(Point::new(1e30, 0.0)));

    let err = encode(&map).expect_err("far tile");

    assert!(matches!(err, CodecError::OutOfRange { row: 0, max: MAX_GRID_SPAN, .. }));
}

#[test]
fn grid_limit_is_exclusive() {
    let mut map = grid_map(1, 1);
    map.tiles.push(Tile::new(Point::from_cell(MAX_GRID_SPAN, 0)));
    assert!(matches!(encode(&map), Err(CodecError::OutOfRange { .. })));

    map.tiles.pop();
    map.tiles.push(Tile::new(Point::from_cell(MAX_GRID_SPAN - 1, 0)));
    assert!(matches!(encode(&map), Err(CodecError::MissingTile { column: 1, row: 0 })));
}

#[test]
fn encode_rejects_gaps() {
    let mut map = grid_map(2, 2);
    map.tiles.remove(1);

    let err = encode(&map).expect_err("gap");

    assert!(matches!(err, CodecError::MissingTile { column: 0, row: 1 }));
}

#[test]
fn encode_rejects_misaligned_tiles() {
    let mut map = grid_map(1, 1);
    map.tiles[0].pos = Point::new(50.0, 0.0);

    let err = encode(&map).expect_err("misaligned");

    assert!(matches!(err, CodecError::Misaligned { .. }));
}

#[test]
fn encode_empty_map_has_no_columns() {
    let dto = encode(&GameMap::default()).expect("encode");
    assert!(dto.tiles.is_empty());
}

#[test]
fn decode_rejects_ragged_grid() {
    let dto = GameMapDto {
        tiles: vec![vec!["0,0,0,0".to_owned(); 2], vec!["0,0,0,0".to_owned()]],
        ..GameMapDto::default()
    };

    let err = decode(&dto).expect_err("ragged");

    assert!(matches!(err, CodecError::RaggedGrid { column: 1, len: 1, expected: 2 }));
}

#[test]
fn decode_rejects_malformed_cells() {
    for cell in ["0,0,0", "0,0,0,0,0", "a,0,0,0", "9,0,0,0", "0,4,0,0", "0,0,9,0", ""] {
        let dto = GameMapDto { tiles: vec![vec![cell.to_owned()]], ..GameMapDto::default() };
        let err = decode(&dto).expect_err(cell);
        assert!(matches!(err, CodecError::InvalidCell { column: 0, row: 0, .. }), "{cell}");
    }
}

#[test]
fn decode_tolerates_spaces_in_cells() {
    let dto = GameMapDto { tiles: vec![vec![" 1, 0, 2, 1 ".to_owned()]], ..GameMapDto::default() };

    let map = decode(&dto).expect("decode");

    assert_eq!(map.tiles[0].structure, Structure::new(StructureType::Circle, Rotation::East));
}

#[test]
fn dto_json_shape() {
    let dto = encode(&grid_map(1, 1)).expect("encode");
    let value = serde_json::to_value(&dto).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "id": "map-1", "name": "Loop", "creator": "ada", "tiles": [["0,0,0,0"]] })
    );
}

#[test]
fn game_map_dto_helpers_delegate() {
    let map = grid_map(2, 2);
    let dto = map.to_dto().expect("encode");
    assert_eq!(GameMap::from_dto(&dto).expect("decode"), map);
}
