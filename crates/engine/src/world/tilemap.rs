use std::collections::HashMap;

use crate::app::{world_to_screen, RenderTarget};

use super::geometry::{GridPos, Rect, Vec2};
use super::tile::{ExtractedTile, OffgridTile, Tile, TileKind};

pub const DEFAULT_TILE_SIZE: u32 = 16;

/// 3x3 neighbourhood, centre included. The order is part of the query
/// contract: results come back in exactly this order.
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

/// Same-kind cardinal neighbours -> variant index.
const AUTOTILE_RULES: [(&[(i32, i32)], usize); 9] = [
    (&[(1, 0), (0, 1)], 0),
    (&[(1, 0), (0, 1), (-1, 0)], 1),
    (&[(-1, 0), (0, 1)], 2),
    (&[(-1, 0), (0, -1), (0, 1)], 3),
    (&[(-1, 0), (0, -1)], 4),
    (&[(-1, 0), (0, -1), (1, 0)], 5),
    (&[(1, 0), (0, -1)], 6),
    (&[(1, 0), (0, -1), (0, 1)], 7),
    (&[(1, 0), (-1, 0), (0, 1), (0, -1)], 8),
];

/// Canonical form of a cardinal neighbour set: one bit per offset, so the
/// order the offsets were discovered in does not matter.
fn neighbor_mask(offsets: &[(i32, i32)]) -> u8 {
    offsets.iter().fold(0u8, |mask, offset| {
        match CARDINAL_OFFSETS.iter().position(|cardinal| cardinal == offset) {
            Some(bit) => mask | (1 << bit),
            None => mask,
        }
    })
}

/// Variant chosen for a tile whose same-kind cardinal neighbours sit at
/// `offsets`. `None` when the set has no rule (e.g. isolated tiles).
pub fn autotile_variant(offsets: &[(i32, i32)]) -> Option<usize> {
    let mask = neighbor_mask(offsets);
    if mask == 0 {
        return None;
    }
    AUTOTILE_RULES
        .iter()
        .find(|(rule, _)| neighbor_mask(rule) == mask)
        .map(|(_, variant)| *variant)
}

/// Sparse tile world: on-grid tiles keyed by cell plus a free list of
/// decorative off-grid tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: u32,
    tiles: HashMap<GridPos, Tile>,
    offgrid: Vec<OffgridTile>,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl Tilemap {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            tiles: HashMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        tile_size: u32,
        tiles: HashMap<GridPos, Tile>,
        offgrid: Vec<OffgridTile>,
    ) -> Self {
        Self {
            tile_size: tile_size.max(1),
            tiles,
            offgrid,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn on_grid_len(&self) -> usize {
        self.tiles.len()
    }

    pub fn offgrid_len(&self) -> usize {
        self.offgrid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.offgrid.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.offgrid.clear();
    }

    /// Inserts at `tile.pos`, replacing whatever occupied the cell.
    pub fn place(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.pos, tile)
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<Tile> {
        self.tiles.remove(&pos)
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// On-grid tiles in ascending cell order.
    pub fn sorted_tiles(&self) -> Vec<Tile> {
        let mut tiles = self.tiles.values().copied().collect::<Vec<_>>();
        tiles.sort_by_key(|tile| tile.pos);
        tiles
    }

    pub fn push_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    pub fn offgrid_tiles(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    /// Removes every off-grid tile whose image box contains `pixel`.
    /// `size_of` reports the image extent for a kind/variant pair.
    pub fn remove_offgrid_at<F>(&mut self, pixel: Vec2, size_of: F) -> usize
    where
        F: Fn(TileKind, usize) -> (u32, u32),
    {
        let before = self.offgrid.len();
        self.offgrid.retain(|tile| {
            let (w, h) = size_of(tile.kind, tile.variant);
            !Rect::new(tile.pos.x, tile.pos.y, w as f32, h as f32).contains_point(pixel)
        });
        before - self.offgrid.len()
    }

    pub fn cell_at_pixel(&self, pixel: Vec2) -> GridPos {
        GridPos::from_pixel(pixel, self.tile_size)
    }

    pub fn tiles_around(&self, pixel: Vec2) -> Vec<Tile> {
        let center = self.cell_at_pixel(pixel);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.tiles.get(&center.offset(dx, dy)).copied())
            .collect()
    }

    pub fn physics_rects_around(&self, pixel: Vec2) -> Vec<Rect> {
        self.tiles_around(pixel)
            .into_iter()
            .filter(|tile| tile.kind.is_collidable())
            .map(|tile| self.cell_rect(tile.pos))
            .collect()
    }

    pub fn solid_check(&self, pixel: Vec2) -> Option<Tile> {
        self.tiles
            .get(&self.cell_at_pixel(pixel))
            .filter(|tile| tile.kind.is_collidable())
            .copied()
    }

    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        let origin = pos.to_pixel(self.tile_size);
        let size = self.tile_size as f32;
        Rect::new(origin.x, origin.y, size, size)
    }

    /// Collects copies of every tile matching one of `pairs`. On-grid copies
    /// carry their pixel position. With `keep == false` the matches are
    /// removed once the scan is complete.
    pub fn extract(&mut self, pairs: &[(TileKind, usize)], keep: bool) -> Vec<ExtractedTile> {
        let wanted = |kind: TileKind, variant: usize| pairs.contains(&(kind, variant));
        let mut matches = Vec::new();

        for tile in &self.offgrid {
            if wanted(tile.kind, tile.variant) {
                matches.push(ExtractedTile {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.pos,
                    on_grid: false,
                });
            }
        }

        let mut grid_hits = self
            .tiles
            .values()
            .filter(|tile| wanted(tile.kind, tile.variant))
            .copied()
            .collect::<Vec<_>>();
        grid_hits.sort_by_key(|tile| tile.pos);
        for tile in &grid_hits {
            matches.push(ExtractedTile {
                kind: tile.kind,
                variant: tile.variant,
                pos: tile.pos.to_pixel(self.tile_size),
                on_grid: true,
            });
        }

        if !keep {
            self.offgrid
                .retain(|tile| !wanted(tile.kind, tile.variant));
            for tile in grid_hits {
                self.tiles.remove(&tile.pos);
            }
        }

        matches
    }

    /// Rewrites the variant of every autotiling tile from its same-kind
    /// cardinal neighbours. Tiles without a matching rule keep their variant.
    pub fn autotile(&mut self) -> usize {
        let updates = self
            .tiles
            .values()
            .filter(|tile| tile.kind.autotiles())
            .filter_map(|tile| {
                let neighbors = CARDINAL_OFFSETS
                    .iter()
                    .copied()
                    .filter(|&(dx, dy)| {
                        self.tiles
                            .get(&tile.pos.offset(dx, dy))
                            .is_some_and(|neighbor| neighbor.kind == tile.kind)
                    })
                    .collect::<Vec<_>>();
                autotile_variant(&neighbors).map(|variant| (tile.pos, variant))
            })
            .collect::<Vec<_>>();

        let mut changed = 0;
        for (pos, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&pos) {
                if tile.variant != variant {
                    tile.variant = variant;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Cells that can appear inside a `view` sized window scrolled to
    /// `camera_offset`, padded by one cell on each side.
    pub fn visible_cells(
        &self,
        camera_offset: (i32, i32),
        view: (u32, u32),
    ) -> impl Iterator<Item = GridPos> {
        let size = self.tile_size as i32;
        let x_start = camera_offset.0.div_euclid(size) - 1;
        let x_end = (camera_offset.0 + view.0 as i32).div_euclid(size) + 1;
        let y_start = camera_offset.1.div_euclid(size) - 1;
        let y_end = (camera_offset.1 + view.1 as i32).div_euclid(size) + 1;
        (x_start..x_end).flat_map(move |x| (y_start..y_end).map(move |y| GridPos::new(x, y)))
    }

    /// Draws off-grid decoration first, then the visible on-grid window.
    pub fn render(&self, target: &mut dyn RenderTarget, camera_offset: (i32, i32)) {
        for tile in &self.offgrid {
            let dest = world_to_screen(tile.pos, camera_offset);
            target.draw_tile(tile.kind, tile.variant, dest, u8::MAX);
        }

        for pos in self.visible_cells(camera_offset, target.view_size()) {
            if let Some(tile) = self.tiles.get(&pos) {
                let dest = world_to_screen(pos.to_pixel(self.tile_size), camera_offset);
                target.draw_tile(tile.kind, tile.variant, dest, u8::MAX);
            }
        }
    }
}
