use super::effects::{Effect, EffectQueue};
use super::geometry::{Rect, Vec2};
use super::tile::{ExtractedTile, TileKind};

/// `large_decor` variant drawn as a tree; its canopy drops leaves.
pub const TREE_VARIANT: usize = 2;
/// Canopy box relative to the tree image's top-left corner.
const CANOPY_INSET: f32 = 4.0;
const CANOPY_SIZE: f32 = 23.0;
/// A spawner emits on a tick with probability `area / LEAF_ODDS`.
const LEAF_ODDS: f32 = 49_999.0;

/// Area under a tree canopy that occasionally requests a falling leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafSpawner {
    area: Rect,
}

impl LeafSpawner {
    pub fn under_tree(tree_pos: Vec2) -> Self {
        Self {
            area: Rect::new(
                tree_pos.x + CANOPY_INSET,
                tree_pos.y + CANOPY_INSET,
                CANOPY_SIZE,
                CANOPY_SIZE,
            ),
        }
    }

    /// Spawners for every tree in `tiles`, ignoring everything else.
    pub fn from_trees(tiles: &[ExtractedTile]) -> Vec<LeafSpawner> {
        tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::LargeDecor && tile.variant == TREE_VARIANT)
            .map(|tile| LeafSpawner::under_tree(tile.pos))
            .collect()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Rolls once for this tick and requests a leaf at a uniform point of
    /// the canopy when the roll succeeds.
    pub fn tick(&self, rng: &mut fastrand::Rng, effects: &mut EffectQueue) -> bool {
        if rng.f32() * LEAF_ODDS >= self.area.w * self.area.h {
            return false;
        }
        let origin = Vec2::new(
            self.area.x + rng.f32() * self.area.w,
            self.area.y + rng.f32() * self.area.h,
        );
        effects.emit(Effect::Leaf { origin });
        true
    }
}
