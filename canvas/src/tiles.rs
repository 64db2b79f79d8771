//! Course renderer: projects a [`GameMap`] onto a layer in three passes.
//!
//! Each pass walks the tiles in reverse index order:
//!
//! 1. ground (non-grass covers; the grass floor is filled once beforehand),
//! 2. shadow (solid structures drawn with a drop shadow),
//! 3. structure (every visible structure, clean).
//!
//! Rotated shapes are drawn once in a canonical north-facing frame centred
//! on the tile and rotated into place with [`with_transform`].

#[cfg(test)]
#[path = "tiles_test.rs"]
mod tiles_test;

use std::rc::Rc;

use wire::map::{GameMap, Ground, GroundType, Rotation, Structure, StructureType, Tile};

use crate::consts::*;
use crate::geometry::{Point, cell_center};
use crate::paint::{Fill, PaintError, Painter, PathOp, Shadow, Stroke, circle, square, with_transform};
use crate::surface::{FrameInfo, Layer};

/// Which structures a renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFilter {
    /// Ground plus every structure.
    All,
    /// Ground plus floor structures (start, hole, portal): the layer under the balls.
    Floor,
    /// Solid structures only: the layer above the balls.
    Solid,
}

impl LayerFilter {
    fn draws_ground(self) -> bool {
        matches!(self, Self::All | Self::Floor)
    }

    fn admits(self, kind: StructureType) -> bool {
        match self {
            Self::All => kind.is_floor() || kind.is_solid(),
            Self::Floor => kind.is_floor(),
            Self::Solid => kind.is_solid(),
        }
    }
}

/// Holds the current map and draws it on demand.
#[derive(Debug)]
pub struct MapRenderer {
    filter: LayerFilter,
    map: Option<Rc<GameMap>>,
}

impl MapRenderer {
    #[must_use]
    pub fn new(filter: LayerFilter) -> Self {
        Self { filter, map: None }
    }

    /// Replace the map. The host redraws immediately after.
    pub fn set_game_map(&mut self, map: Rc<GameMap>) {
        self.map = Some(map);
    }

    #[must_use]
    pub fn game_map(&self) -> Option<&Rc<GameMap>> {
        self.map.as_ref()
    }

    #[must_use]
    pub fn filter(&self) -> LayerFilter {
        self.filter
    }

    /// Draw the held map. Nothing is drawn before a map is set.
    ///
    /// # Errors
    ///
    /// Propagates any drawing backend failure.
    pub fn draw(&self, painter: &mut dyn Painter) -> Result<(), PaintError> {
        let Some(map) = &self.map else {
            return Ok(());
        };
        draw_map(painter, &map.tiles, self.filter)
    }
}

impl Layer for MapRenderer {
    fn render(&mut self, painter: &mut dyn Painter, _frame: FrameInfo) -> Result<(), PaintError> {
        self.draw(painter)
    }
}

/// Draw `tiles` with the three-pass order.
///
/// # Errors
///
/// Propagates any drawing backend failure.
pub fn draw_map(painter: &mut dyn Painter, tiles: &[Tile], filter: LayerFilter) -> Result<(), PaintError> {
    if filter.draws_ground() {
        let floor = [PathOp::Rect { origin: Point::new(0.0, 0.0), width: GAME_WIDTH, height: GAME_HEIGHT }];
        painter.fill(&floor, Fill::Solid(GRASS))?;

        for tile in tiles.iter().rev() {
            if tile.ground.kind != GroundType::Grass {
                draw_ground(painter, tile.pos, tile.ground)?;
            }
        }
    }

    for tile in tiles.iter().rev() {
        if tile.structure.kind.is_solid() && filter.admits(tile.structure.kind) {
            draw_structure(painter, tile.pos, tile.structure, true)?;
        }
    }

    for tile in tiles.iter().rev() {
        if filter.admits(tile.structure.kind) {
            draw_structure(painter, tile.pos, tile.structure, false)?;
        }
    }

    Ok(())
}

// =============================================================
// Ground
// =============================================================

/// Draw one ground cover at the tile whose corner is `pos`.
///
/// # Errors
///
/// Propagates any drawing backend failure.
pub fn draw_ground(painter: &mut dyn Painter, pos: Point, ground: Ground) -> Result<(), PaintError> {
    match ground.kind {
        GroundType::Grass => draw_flat(painter, pos, GRASS),
        GroundType::Water => draw_flat(painter, pos, WATER),
        GroundType::Gravel => draw_flat(painter, pos, GRAVEL),
        GroundType::GravelHeavy => draw_flat(painter, pos, GRAVEL_HEAVY),
        GroundType::Slope => draw_slope(painter, pos, ground.rotation, false),
        GroundType::SlopeDiagonal => draw_slope(painter, pos, ground.rotation, true),
    }
}

fn draw_flat(painter: &mut dyn Painter, pos: Point, color: &'static str) -> Result<(), PaintError> {
    with_transform(painter, cell_center(pos), 0.0, |p| {
        let block = square(Point::default(), BLOCK_SIZE);
        p.fill(&block, Fill::Solid(color))?;
        p.stroke(&block, Stroke::solid(color, GROUND_LINE_WIDTH))
    })
}

fn slope_color(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::North => SLOPE_NORTH,
        Rotation::East => SLOPE_EAST,
        Rotation::South => SLOPE_SOUTH,
        Rotation::West => SLOPE_WEST,
    }
}

/// Chevron pointing up-hill in the canonical frame.
fn slope_arrow(diagonal: bool) -> [PathOp; 3] {
    let q = BLOCK_SIZE / 4.0;
    let e = BLOCK_SIZE / 8.0;
    if diagonal {
        [
            PathOp::MoveTo(Point::new(-e, q)),
            PathOp::LineTo(Point::new(-e, -e)),
            PathOp::LineTo(Point::new(q, -e)),
        ]
    } else {
        [
            PathOp::MoveTo(Point::new(-q, e)),
            PathOp::LineTo(Point::new(0.0, -e)),
            PathOp::LineTo(Point::new(q, e)),
        ]
    }
}

fn draw_slope(painter: &mut dyn Painter, pos: Point, rotation: Rotation, diagonal: bool) -> Result<(), PaintError> {
    let color = slope_color(rotation);
    with_transform(painter, cell_center(pos), rotation.angle(), |p| {
        let block = square(Point::default(), BLOCK_SIZE);
        p.fill(&block, Fill::Solid(color))?;
        p.stroke(&block, Stroke::solid(color, GROUND_LINE_WIDTH))?;
        p.stroke(&slope_arrow(diagonal), Stroke::solid(WALL_BORDER, SLOPE_ARROW_WIDTH))
    })
}

// =============================================================
// Structures
// =============================================================

/// Drop shadow used by solid structures and balls.
pub const DROP_SHADOW: Shadow = Shadow {
    color: SHADOW_COLOR,
    blur: SHADOW_BLUR,
    offset: Point { x: SHADOW_OFFSET, y: SHADOW_OFFSET },
};

/// Draw one structure at the tile whose corner is `pos`. `shadowed` only
/// affects solid structures.
///
/// # Errors
///
/// Propagates any drawing backend failure.
pub fn draw_structure(
    painter: &mut dyn Painter,
    pos: Point,
    structure: Structure,
    shadowed: bool,
) -> Result<(), PaintError> {
    let center = cell_center(pos);
    match structure.kind {
        StructureType::None => Ok(()),
        StructureType::Start => with_transform(painter, center, 0.0, |p| {
            p.fill(&circle(Point::default(), START_RADIUS), Fill::Solid(START))
        }),
        StructureType::Hole => with_transform(painter, center, 0.0, |p| {
            p.fill(&circle(Point::default(), HALF_BLOCK), Fill::Solid(HOLE))
        }),
        StructureType::Portal => with_transform(painter, center, 0.0, |p| {
            let fill = Fill::Radial {
                inner: PORTAL_CENTER,
                outer: PORTAL_RIM,
                inner_radius: HALF_BLOCK / 3.0,
                outer_radius: HALF_BLOCK,
            };
            p.fill(&circle(Point::default(), HALF_BLOCK), fill)
        }),
        StructureType::Wall => {
            draw_solid(painter, center, Rotation::North, shadowed, &square(Point::default(), BLOCK_SIZE))
        }
        StructureType::Circle => {
            draw_solid(painter, center, Rotation::North, shadowed, &circle(Point::default(), CIRCLE_RADIUS))
        }
        StructureType::Wedge => draw_solid(painter, center, structure.rotation, shadowed, &wedge()),
        StructureType::RoundedCorner => {
            draw_solid(painter, center, structure.rotation, shadowed, &rounded_corner(false))
        }
        StructureType::InvertedRoundedCorner => {
            draw_solid(painter, center, structure.rotation, shadowed, &rounded_corner(true))
        }
    }
}

fn draw_solid(
    painter: &mut dyn Painter,
    center: Point,
    rotation: Rotation,
    shadowed: bool,
    shape: &[PathOp],
) -> Result<(), PaintError> {
    with_transform(painter, center, rotation.angle(), |p| {
        if shadowed {
            p.set_shadow(Some(DROP_SHADOW));
        }
        p.fill(shape, Fill::Solid(WALL))?;
        p.stroke(shape, Stroke::solid(WALL_BORDER, WALL_LINE_WIDTH))
    })
}

/// Right triangle filling the north-west half of the cell.
fn wedge() -> [PathOp; 4] {
    [
        PathOp::MoveTo(Point::new(-HALF_BLOCK, -HALF_BLOCK)),
        PathOp::LineTo(Point::new(HALF_BLOCK, -HALF_BLOCK)),
        PathOp::LineTo(Point::new(-HALF_BLOCK, HALF_BLOCK)),
        PathOp::Close,
    ]
}

/// Quarter-round corner; the inverted form bows toward the corner instead
/// of away from it.
fn rounded_corner(inverted: bool) -> [PathOp; 4] {
    let corner = if inverted {
        Point::new(-HALF_BLOCK, -HALF_BLOCK)
    } else {
        Point::new(HALF_BLOCK, HALF_BLOCK)
    };
    [
        PathOp::MoveTo(Point::new(-HALF_BLOCK, -HALF_BLOCK)),
        PathOp::LineTo(Point::new(HALF_BLOCK, -HALF_BLOCK)),
        PathOp::ArcTo { corner, end: Point::new(-HALF_BLOCK, HALF_BLOCK), radius: BLOCK_SIZE },
        PathOp::Close,
    ]
}
