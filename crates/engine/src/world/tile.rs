use serde::{Deserialize, Serialize};

use super::geometry::{GridPos, Vec2};

/// Tile category. The serialized name doubles as the asset folder name
/// under `tiles/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Decor,
    LargeDecor,
    Grass,
    Stone,
    Spawners,
}

impl TileKind {
    /// Palette order used by the editor and the asset loader.
    pub const ALL: [TileKind; 5] = [
        TileKind::Decor,
        TileKind::LargeDecor,
        TileKind::Grass,
        TileKind::Stone,
        TileKind::Spawners,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Spawners => "spawners",
        }
    }

    /// Whether bodies collide with this kind when it sits on the grid.
    pub const fn is_collidable(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    pub const fn autotiles(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }
}

/// Spawner variants placed by the editor and consumed on level load.
pub const SPAWNER_PLAYER_VARIANT: usize = 0;
pub const SPAWNER_ENEMY_VARIANT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: GridPos,
}

impl Tile {
    pub const fn new(kind: TileKind, variant: usize, pos: GridPos) -> Self {
        Self { kind, variant, pos }
    }
}

/// Decorative tile at an arbitrary pixel position. Never collides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: Vec2,
}

impl OffgridTile {
    pub const fn new(kind: TileKind, variant: usize, pos: Vec2) -> Self {
        Self { kind, variant, pos }
    }
}

/// Copy of a tile returned by extraction, always in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedTile {
    pub kind: TileKind,
    pub variant: usize,
    pub pos: Vec2,
    pub on_grid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_names_match_asset_folders() {
        for kind in TileKind::ALL {
            let json = serde_json::to_string(&kind).expect("encode");
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn only_terrain_collides_and_autotiles() {
        let collidable = TileKind::ALL
            .iter()
            .filter(|kind| kind.is_collidable())
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(collidable, vec![TileKind::Grass, TileKind::Stone]);
        assert!(!TileKind::Spawners.autotiles());
        assert!(TileKind::Stone.autotiles());
    }
}
