//! Hex geometry: tile corners, grid sizing and enumeration, hit-testing.
//!
//! Coordinates are logical pixels, x to the right and y downward. Tiles are
//! addressed by offset `(column, row)`; each also carries its axial [`Hex`]
//! so neighbour relationships and pixel conversion come straight from `hexx`.
//!
//! The hexagon at `(0, 0)` has the top-left corner of its bounding box at the
//! layer origin. Flat-topped grids shift odd columns down by half a tile,
//! pointy-topped grids shift odd rows right by half a tile.

use bevy::log::warn;
use bevy::math::Vec2;
use hexx::{Hex, HexLayout, HexOrientation, OffsetHexMode};

use crate::config::HexSpec;
use crate::render::TileNode;

/// Upper bound on the tiles of one generation.
pub const MAX_TILES: u64 = 1 << 20;

/// Odd columns (flat) or odd rows (pointy) are the shifted ones.
const OFFSET_MODE: OffsetHexMode = OffsetHexMode::Odd;

/// Number of columns and rows in one grid generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridDimensions {
    /// Tile columns.
    pub columns: u32,
    /// Tile rows.
    pub rows: u32,
}

impl GridDimensions {
    /// Sizes a grid for a `width` × `height` viewport.
    ///
    /// `ceil(extent / size) + overscan` along each axis. An empty viewport (or a
    /// non-positive size) yields an empty grid, and so does a grid that would
    /// exceed [`MAX_TILES`].
    pub fn for_viewport(width: f32, height: f32, size: f32, overscan: u32) -> Self {
        if !(width > 0.0 && height > 0.0 && size > 0.0)
            || !width.is_finite()
            || !height.is_finite()
        {
            return Self::default();
        }
        let span = |extent: f32| {
            let cells = (extent / size).ceil();
            if cells.is_finite() && cells < u32::MAX as f32 {
                (cells as u32).checked_add(overscan)
            } else {
                None
            }
        };
        let dims = match (span(width), span(height)) {
            (Some(columns), Some(rows)) => Self { columns, rows },
            _ => {
                warn!(width, height, size, overscan, "hex grid extent overflows, skipping");
                return Self::default();
            }
        };
        if dims.tile_count() > MAX_TILES {
            warn!(
                columns = dims.columns,
                rows = dims.rows,
                max = MAX_TILES,
                "hex grid too large, skipping"
            );
            return Self::default();
        }
        dims
    }

    /// Total tile count, without overflow.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Total tile count.
    pub fn len(&self) -> usize {
        usize::try_from(self.tile_count()).unwrap_or(usize::MAX)
    }

    /// `true` when the grid has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }
}

/// Stable tile identity: the generation that created it plus its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// Grid generation the tile belongs to.
    pub generation: u32,
    /// Row-major slot, `row * columns + column`.
    pub index: u32,
}

/// One hexagon of a grid generation.
#[derive(Clone, Debug)]
pub struct Tile {
    /// Identity used as the animation key.
    pub id: TileId,
    /// Offset column.
    pub column: u32,
    /// Offset row.
    pub row: u32,
    /// Axial coordinate.
    pub hex: Hex,
    /// Corners in layer space, in `hexx` vertex order.
    pub corners: [Vec2; 6],
    /// Current transparency in `[0, 1]`.
    pub alpha: f32,
    /// Drawing commands for this tile's visual.
    pub node: TileNode,
    /// Pointer hit region; `None` until bound.
    pub hit_area: Option<[Vec2; 6]>,
}

impl Tile {
    /// Centre point in layer space.
    pub fn center(&self) -> Vec2 {
        self.corners.iter().copied().sum::<Vec2>() / 6.0
    }
}

/// The full tile set produced by one enumeration pass.
#[derive(Clone, Debug)]
pub struct Generation {
    id: u32,
    dims: GridDimensions,
    layout: HexLayout,
    offset: Vec2,
    tiles: Vec<Tile>,
}

impl Generation {
    /// Generation number shared by every [`TileId`] inside.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    /// Layer-space layout the tiles were placed with.
    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    /// Layer translation relative to the surface origin.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable tiles in row-major order.
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Looks a tile up by identity. Ids from other generations miss.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        if id.generation != self.id {
            return None;
        }
        self.tiles.get(id.index as usize)
    }

    /// Mutable lookup by identity. Ids from other generations miss.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        if id.generation != self.id {
            return None;
        }
        self.tiles.get_mut(id.index as usize)
    }

    /// Looks a tile up by offset address.
    pub fn tile_at_address(&self, column: u32, row: u32) -> Option<&Tile> {
        if column >= self.dims.columns || row >= self.dims.rows {
            return None;
        }
        self.tiles.get((row * self.dims.columns + column) as usize)
    }

    /// Looks a tile up by axial coordinate.
    pub fn tile_at_hex(&self, hex: Hex) -> Option<&Tile> {
        let (column, row) = hex_to_offset(hex, self.layout.orientation)?;
        self.tile_at_address(column, row)
    }

    /// The tile whose hexagon contains `surface_point`, if any.
    ///
    /// `surface_point` is in surface space; the layer offset is removed first.
    pub fn tile_at(&self, surface_point: Vec2) -> Option<&Tile> {
        let hex = self.layout.world_pos_to_hex(surface_point - self.offset);
        self.tile_at_hex(hex)
    }
}

/// Layer-space layout of hexagons of circumradius `size`, with the bounding
/// box of hex `(0, 0)` at the origin.
pub fn layer_layout(size: f32, orientation: HexOrientation) -> HexLayout {
    let layout = HexLayout::new(orientation).with_hex_size(size);
    let origin = layout.rect_size() / 2.0;
    layout.with_origin(origin)
}

/// Axial coordinate of an offset address.
pub fn offset_to_hex(column: u32, row: u32, orientation: HexOrientation) -> Hex {
    Hex::from_offset_coordinates([column as i32, row as i32], OFFSET_MODE, orientation)
}

/// Offset address of an axial coordinate; `None` when it falls left of or
/// above the grid origin.
pub fn hex_to_offset(hex: Hex, orientation: HexOrientation) -> Option<(u32, u32)> {
    let [column, row] = hex.to_offset_coordinates(OFFSET_MODE, orientation);
    Some((u32::try_from(column).ok()?, u32::try_from(row).ok()?))
}

/// Enumerates every tile of a `dims` grid, row-major, with precomputed corners.
///
/// Tiles start at `alpha` with empty draw nodes and no hit region. Grids over
/// [`MAX_TILES`] come back empty.
pub fn enumerate_grid(
    generation: u32,
    dims: GridDimensions,
    spec: &HexSpec,
    alpha: f32,
) -> Generation {
    let dims = if dims.tile_count() > MAX_TILES {
        warn!(columns = dims.columns, rows = dims.rows, "hex grid too large, enumerating nothing");
        GridDimensions::default()
    } else {
        dims
    };
    let layout = layer_layout(spec.size, spec.orientation);
    let mut tiles = Vec::with_capacity(dims.len());
    for row in 0..dims.rows {
        for column in 0..dims.columns {
            let hex = offset_to_hex(column, row, spec.orientation);
            tiles.push(Tile {
                id: TileId {
                    generation,
                    index: row * dims.columns + column,
                },
                column,
                row,
                hex,
                corners: layout.hex_corners(hex),
                alpha,
                node: TileNode::default(),
                hit_area: None,
            });
        }
    }
    Generation {
        id: generation,
        dims,
        layout,
        offset: spec.grid_offset,
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::SQRT_3;

    const EPS: f32 = 1e-3;

    fn corners_at(size: f32, orientation: HexOrientation, column: u32, row: u32) -> [Vec2; 6] {
        layer_layout(size, orientation).hex_corners(offset_to_hex(column, row, orientation))
    }

    fn spec(size: f32, orientation: HexOrientation) -> HexSpec {
        HexSpec {
            size,
            orientation,
            ..HexSpec::default()
        }
    }

    fn shared_corners(a: &[Vec2; 6], b: &[Vec2; 6]) -> usize {
        a.iter()
            .filter(|p| b.iter().any(|q| p.distance(*q) < EPS))
            .count()
    }

    // ── GridDimensions ──────────────────────────────────────────────

    #[test]
    fn example_viewport_dimensions() {
        let dims = GridDimensions::for_viewport(800.0, 600.0, 90.0, 6);
        assert_eq!(dims, GridDimensions { columns: 15, rows: 13 });
        assert_eq!(dims.len(), 195);
    }

    #[test]
    fn zero_sized_viewport_is_empty() {
        assert!(GridDimensions::for_viewport(0.0, 600.0, 90.0, 6).is_empty());
        assert!(GridDimensions::for_viewport(800.0, 0.0, 90.0, 6).is_empty());
    }

    #[test]
    fn non_finite_viewport_is_empty() {
        assert!(GridDimensions::for_viewport(f32::INFINITY, 10.0, 90.0, 6).is_empty());
        assert!(GridDimensions::for_viewport(f32::NAN, 10.0, 90.0, 6).is_empty());
    }

    #[test]
    fn huge_extent_is_empty_instead_of_overflowing() {
        assert!(GridDimensions::for_viewport(1.0e20, 10.0, 1.0, 6).is_empty());
        assert!(GridDimensions::for_viewport(10.0, 10.0, 1.0, u32::MAX).is_empty());
    }

    #[test]
    fn tiny_hexes_exceeding_the_cap_are_empty() {
        let dims = GridDimensions::for_viewport(800.0, 600.0, 0.001, 6);
        assert!(dims.is_empty());
        let at_cap = GridDimensions::for_viewport(1024.0, 1024.0, 1.0, 0);
        assert_eq!(at_cap.tile_count(), MAX_TILES);
    }

    #[test]
    fn oversized_dimensions_enumerate_nothing() {
        let dims = GridDimensions { columns: u32::MAX, rows: u32::MAX };
        let g = enumerate_grid(0, dims, &HexSpec::default(), 1.0);
        assert!(g.tiles().is_empty());
        assert!(g.dims().is_empty());
    }

    // ── corners ─────────────────────────────────────────────────────

    #[test]
    fn origin_tile_bounding_box_starts_at_origin() {
        for orientation in [HexOrientation::Flat, HexOrientation::Pointy] {
            let corners = corners_at(90.0, orientation, 0, 0);
            let min = corners.iter().copied().fold(Vec2::MAX, Vec2::min);
            assert!(min.length() < EPS, "{orientation:?}: {min}");
        }
    }

    #[test]
    fn flat_tile_has_horizontal_top_edge() {
        let mut ys = corners_at(10.0, HexOrientation::Flat, 0, 0).map(|c| c.y);
        ys.sort_by(f32::total_cmp);
        assert!((ys[0] - ys[1]).abs() < EPS);
        assert!(ys[2] - ys[1] > 1.0);
    }

    #[test]
    fn odd_flat_columns_shift_down() {
        let even = corners_at(10.0, HexOrientation::Flat, 0, 0);
        let odd = corners_at(10.0, HexOrientation::Flat, 1, 0);
        let top = |c: &[Vec2; 6]| c.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((top(&odd) - top(&even) - SQRT_3 * 5.0).abs() < EPS);
    }

    #[test]
    fn axial_neighbours_share_exactly_one_edge() {
        for orientation in [HexOrientation::Flat, HexOrientation::Pointy] {
            let g = enumerate_grid(0, GridDimensions { columns: 5, rows: 5 }, &spec(13.0, orientation), 1.0);
            let center = g.tile_at_address(2, 2).unwrap();
            for neighbour in center.hex.all_neighbors() {
                let other = g.tile_at_hex(neighbour).unwrap();
                assert_eq!(shared_corners(&center.corners, &other.corners), 2);
                let gap = center.center().distance(other.center());
                assert!((gap - SQRT_3 * 13.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn non_neighbours_share_no_corner() {
        let g = enumerate_grid(0, GridDimensions { columns: 5, rows: 5 }, &spec(13.0, HexOrientation::Flat), 1.0);
        let a = g.tile_at_address(0, 0).unwrap();
        let b = g.tile_at_address(2, 0).unwrap();
        assert_eq!(shared_corners(&a.corners, &b.corners), 0);
    }

    // ── offsets ─────────────────────────────────────────────────────

    #[test]
    fn offset_hex_conversion_round_trips() {
        for orientation in [HexOrientation::Flat, HexOrientation::Pointy] {
            for row in 0..6 {
                for column in 0..6 {
                    let hex = offset_to_hex(column, row, orientation);
                    assert_eq!(hex_to_offset(hex, orientation), Some((column, row)));
                }
            }
        }
    }

    #[test]
    fn hex_left_of_origin_has_no_offset() {
        assert_eq!(hex_to_offset(Hex::new(-1, 0), HexOrientation::Flat), None);
    }

    // ── enumerate_grid ──────────────────────────────────────────────

    #[test]
    fn enumeration_is_row_major_with_stable_ids() {
        let g = enumerate_grid(7, GridDimensions { columns: 3, rows: 2 }, &HexSpec::default(), 1.0);
        assert_eq!(g.tiles().len(), 6);
        let t = &g.tiles()[4];
        assert_eq!((t.column, t.row), (1, 1));
        assert_eq!(t.id, TileId { generation: 7, index: 4 });
        assert_eq!(g.tile(t.id).map(|t| t.id), Some(t.id));
    }

    #[test]
    fn ids_from_other_generations_miss() {
        let g = enumerate_grid(2, GridDimensions { columns: 3, rows: 3 }, &HexSpec::default(), 1.0);
        assert!(g.tile(TileId { generation: 1, index: 0 }).is_none());
    }

    // ── hit-testing ─────────────────────────────────────────────────

    #[test]
    fn tile_centres_hit_their_own_tile() {
        for orientation in [HexOrientation::Flat, HexOrientation::Pointy] {
            let g = enumerate_grid(0, GridDimensions { columns: 6, rows: 6 }, &spec(20.0, orientation), 1.0);
            for tile in g.tiles() {
                let surface = tile.center() + g.offset();
                assert_eq!(g.tile_at(surface).map(|t| t.id), Some(tile.id));
            }
        }
    }

    #[test]
    fn points_outside_the_grid_miss() {
        let g = enumerate_grid(0, GridDimensions { columns: 2, rows: 2 }, &spec(20.0, HexOrientation::Flat), 1.0);
        assert!(g.tile_at(Vec2::new(10_000.0, 10_000.0)).is_none());
        assert!(g.tile_at(Vec2::new(-10_000.0, 0.0)).is_none());
    }
}
