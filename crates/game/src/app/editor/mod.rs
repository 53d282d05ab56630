use engine::world::{GridPos, OffgridTile, Tile, TileKind, Vec2};
use engine::{
    window_to_world, AppPaths, InputAction, InputSnapshot, RenderTarget, Scene, SceneCommand,
    SceneKey, SceneWorld, ScreenPoint, ScreenRect,
};
use tracing::{info, warn};

/// Camera pan speed in display pixels per tick.
const PAN_SPEED: f32 = 2.0;
const BACKGROUND_COLOR: [u8; 4] = [100, 100, 250, 255];
/// Opacity of the palette and cursor previews.
const PREVIEW_ALPHA: u8 = 100;
const PALETTE_PREVIEW_POS: ScreenPoint = ScreenPoint::new(5, 5);

include!("types.rs");
include!("scene_impl.rs");
