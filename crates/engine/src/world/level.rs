//! Level document persistence.
//!
//! The on-disk shape is a JSON object with three keys:
//!
//! ```json
//! {
//!   "tilemap": { "3;4": { "type": "grass", "variant": 1, "pos": [3, 4] } },
//!   "tile_size": 16,
//!   "offgrid": [ { "type": "decor", "variant": 0, "pos": [12.5, 40.0] } ]
//! }
//! ```
//!
//! Loading parses and validates the whole document before any in-memory
//! state is touched. Unknown top-level keys are ignored.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{GridPos, Vec2};
use super::tile::{OffgridTile, Tile, TileKind};
use super::tilemap::Tilemap;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse level file {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid level file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("failed to encode level: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write level file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LevelError {
    /// "No map yet" is recoverable; everything else is a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LevelError::NotFound { .. })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelDocument {
    tilemap: BTreeMap<String, GridTileRecord>,
    tile_size: u32,
    offgrid: Vec<OffgridTileRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GridTileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: usize,
    pos: [i32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct OffgridTileRecord {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: usize,
    pos: [f32; 2],
}

pub fn grid_key(pos: GridPos) -> String {
    format!("{};{}", pos.x, pos.y)
}

pub fn parse_grid_key(key: &str) -> Option<GridPos> {
    let (x, y) = key.split_once(';')?;
    Some(GridPos::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

impl Tilemap {
    /// Replaces this map with the contents of `path`. On any error the map
    /// is left exactly as it was.
    pub fn load(&mut self, path: &Path) -> Result<(), LevelError> {
        *self = Tilemap::read_from(path)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Tilemap, LevelError> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LevelError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LevelError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        decode_level(&raw, path)
    }

    pub fn save(&self, path: &Path) -> Result<(), LevelError> {
        let json = encode_level(self)?;
        write_replacing(path, json.as_bytes()).map_err(|source| LevelError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn encode_level(map: &Tilemap) -> Result<String, LevelError> {
    let document = LevelDocument {
        tilemap: map
            .tiles()
            .map(|tile| {
                (
                    grid_key(tile.pos),
                    GridTileRecord {
                        kind: tile.kind,
                        variant: tile.variant,
                        pos: [tile.pos.x, tile.pos.y],
                    },
                )
            })
            .collect(),
        tile_size: map.tile_size(),
        offgrid: map
            .offgrid_tiles()
            .iter()
            .map(|tile| OffgridTileRecord {
                kind: tile.kind,
                variant: tile.variant,
                pos: [tile.pos.x, tile.pos.y],
            })
            .collect(),
    };
    serde_json::to_string(&document).map_err(LevelError::Encode)
}

pub(crate) fn decode_level(raw: &str, path: &Path) -> Result<Tilemap, LevelError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let document: LevelDocument = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|error| {
            let json_path = error.path().to_string();
            LevelError::Parse {
                path: path.to_path_buf(),
                json_path,
                source: error.into_inner(),
            }
        })?;

    let invalid = |reason: String| LevelError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    if document.tile_size == 0 {
        return Err(invalid("tile_size must be positive".to_string()));
    }

    let mut tiles = HashMap::with_capacity(document.tilemap.len());
    for (key, record) in document.tilemap {
        let pos = parse_grid_key(&key)
            .ok_or_else(|| invalid(format!("tilemap key '{key}' is not 'x;y'")))?;
        if pos != GridPos::new(record.pos[0], record.pos[1]) {
            return Err(invalid(format!(
                "tilemap key '{key}' does not match pos [{}, {}]",
                record.pos[0], record.pos[1]
            )));
        }
        tiles.insert(pos, Tile::new(record.kind, record.variant, pos));
    }

    let offgrid = document
        .offgrid
        .into_iter()
        .map(|record| {
            OffgridTile::new(
                record.kind,
                record.variant,
                Vec2::new(record.pos[0], record.pos[1]),
            )
        })
        .collect();

    Ok(Tilemap::from_parts(document.tile_size, tiles, offgrid))
}

/// Writes through a sibling temp file so a crash never leaves a truncated
/// level behind.
fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("level.json");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, bytes)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}
