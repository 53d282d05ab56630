//! Image assets loaded once at startup and shared read-only by every scene.
//!
//! Layout under the images directory:
//!
//! * `tiles/<kind>/*.png` - one file per variant, ordered by file name
//! * `entities/<player|enemy>/<action>/*.png` - animation frames
//! * `gun.png`, `projectile.png`
//!
//! Pure black pixels are treated as transparent. Anything that fails to load
//! is reported once and left out; renderers draw a flat fallback instead.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{info, warn};

use crate::world::{
    default_frame_duration, ActionState, Animation, AnimationLibrary, BodyKind, TileKind,
};

pub const COLOR_KEY: [u8; 3] = [0, 0, 0];

/// Named single images the game draws outside the tile and animation sets.
pub const NAMED_SPRITES: [&str; 2] = ["gun", "projectile"];

/// Variant counts used when a tile folder is missing, matching the stock
/// tile sheets. Keeps the editor palette and spawner variants usable
/// without art on disk.
const FALLBACK_VARIANT_COUNTS: [(TileKind, usize); 5] = [
    (TileKind::Decor, 4),
    (TileKind::LargeDecor, 3),
    (TileKind::Grass, 9),
    (TileKind::Stone, 9),
    (TileKind::Spawners, 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedSprite {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Default)]
pub struct AssetStore {
    sprites: Vec<LoadedSprite>,
    tiles: HashMap<TileKind, Vec<SpriteId>>,
    named: HashMap<&'static str, SpriteId>,
    animations: AnimationLibrary<SpriteId>,
}

impl AssetStore {
    /// Store with no images at all. Every lookup misses and every tile kind
    /// reports its fallback variant count.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(images_dir: &Path) -> Self {
        let mut store = Self::default();
        let mut failures = 0usize;

        for kind in TileKind::ALL {
            let dir = images_dir.join("tiles").join(kind.name());
            let ids = store.load_folder(&dir, &mut failures);
            if !ids.is_empty() {
                store.tiles.insert(kind, ids);
            }
        }

        for kind in [BodyKind::Player, BodyKind::Enemy] {
            for action in ActionState::ALL {
                let dir = images_dir
                    .join("entities")
                    .join(kind.name())
                    .join(action.name());
                if !dir.is_dir() {
                    continue;
                }
                let frames = store.load_folder(&dir, &mut failures);
                if frames.is_empty() {
                    continue;
                }
                store.animations.insert(
                    kind,
                    action,
                    Animation::new(frames, default_frame_duration(kind, action), true),
                );
            }
        }

        for name in NAMED_SPRITES {
            let path = images_dir.join(format!("{name}.png"));
            match load_sprite(&path) {
                Ok(sprite) => {
                    let id = store.push(sprite);
                    store.named.insert(name, id);
                }
                Err(error) => {
                    failures += 1;
                    warn!(sprite = name, error = %error, "sprite_load_failed");
                }
            }
        }

        info!(
            images_dir = %images_dir.display(),
            sprites = store.sprites.len(),
            animations = store.animations.len(),
            failures,
            "assets_loaded"
        );
        store
    }

    fn load_folder(&mut self, dir: &Path, failures: &mut usize) -> Vec<SpriteId> {
        let paths = match sorted_pngs(dir) {
            Ok(paths) => paths,
            Err(error) => {
                *failures += 1;
                warn!(error = %error, "sprite_load_failed");
                return Vec::new();
            }
        };
        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            match load_sprite(&path) {
                Ok(sprite) => ids.push(self.push(sprite)),
                Err(error) => {
                    *failures += 1;
                    warn!(error = %error, "sprite_load_failed");
                }
            }
        }
        ids
    }

    fn push(&mut self, sprite: LoadedSprite) -> SpriteId {
        let id = SpriteId(self.sprites.len() as u32);
        self.sprites.push(sprite);
        id
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&LoadedSprite> {
        self.sprites.get(id.0 as usize)
    }

    pub fn sprite_size(&self, id: SpriteId) -> Option<(u32, u32)> {
        self.sprite(id).map(LoadedSprite::size)
    }

    pub fn tile_sprite_id(&self, kind: TileKind, variant: usize) -> Option<SpriteId> {
        self.tiles.get(&kind)?.get(variant).copied()
    }

    pub fn tile_sprite(&self, kind: TileKind, variant: usize) -> Option<&LoadedSprite> {
        self.sprite(self.tile_sprite_id(kind, variant)?)
    }

    /// Pixel extent of a tile image, falling back to `tile_size` squares.
    pub fn tile_extent(&self, kind: TileKind, variant: usize, tile_size: u32) -> (u32, u32) {
        self.tile_sprite(kind, variant)
            .map(LoadedSprite::size)
            .unwrap_or((tile_size, tile_size))
    }

    /// Number of variants the editor can cycle through for `kind`. Never 0.
    pub fn variant_count(&self, kind: TileKind) -> usize {
        match self.tiles.get(&kind) {
            Some(ids) if !ids.is_empty() => ids.len(),
            _ => FALLBACK_VARIANT_COUNTS
                .iter()
                .find(|(fallback_kind, _)| *fallback_kind == kind)
                .map(|(_, count)| *count)
                .unwrap_or(1),
        }
    }

    pub fn named(&self, name: &str) -> Option<SpriteId> {
        self.named.get(name).copied()
    }

    pub fn animations(&self) -> &AnimationLibrary<SpriteId> {
        &self.animations
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }
}

fn sorted_pngs(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let entries = fs::read_dir(dir).map_err(|source| AssetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AssetError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn load_sprite(path: &Path) -> Result<LoadedSprite, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    let (width, height) = (image.width(), image.height());
    let mut rgba = image.into_raw();
    apply_color_key(&mut rgba);
    Ok(LoadedSprite {
        width,
        height,
        rgba,
    })
}

fn apply_color_key(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        if pixel[..3] == COLOR_KEY {
            pixel[3] = 0;
        }
    }
}
