use std::f32::consts::PI;

use engine::world::{
    BodyContext, Effect, EffectQueue, Enemy, EnemyOutcome, LeafSpawner, PhysicsBody, Player,
    PlayerOutcome, PlayerView, Projectile, ProjectileOutcome, ProjectileTarget, SoundCue,
    TileKind, Vec2, SPAWNER_ENEMY_VARIANT, SPAWNER_PLAYER_VARIANT, TREE_VARIANT,
};
use engine::{
    AppPaths, InputSnapshot, RenderTarget, Scene, SceneCommand, SceneKey, SceneWorld,
    ScreenPoint, ScreenRect, SpriteId,
};
use tracing::{debug, info, warn};

const PLAYER_START: Vec2 = Vec2::new(50.0, 50.0);
/// Opening transition starts here and counts up to 0.
const TRANSITION_START: i32 = -30;
/// Closing transition length; the next level loads past this value.
const TRANSITION_END: i32 = 30;
/// Circle radius growth per transition step, in display pixels.
const TRANSITION_RADIUS_STEP: i32 = 8;
const DEATH_FADE_TICK: u32 = 10;
const DEATH_RELOAD_TICK: u32 = 60;
const PROJECTILE_HIT_SHAKE: u32 = 32;
const PROJECTILE_HIT_SPARKS: u32 = 30;
const PROJECTILE_HIT_BURST: u32 = 30;
const WALL_HIT_SPARKS: u32 = 4;
const WALL_HIT_JITTER: f32 = 0.5;
const GUN_BARREL_GAP: i32 = 4;
const SKY_COLOR: [u8; 4] = [120, 164, 220, 255];
const TRANSITION_COLOR: [u8; 4] = [0, 0, 0, 255];
const PLAYER_FALLBACK_COLOR: [u8; 4] = [236, 236, 246, 255];
const ENEMY_FALLBACK_COLOR: [u8; 4] = [200, 64, 64, 255];
const PROJECTILE_FALLBACK_COLOR: [u8; 4] = [255, 236, 140, 255];
const PROJECTILE_FALLBACK_SIZE: (u32, u32) = (4, 2);

include!("types.rs");
include!("systems.rs");
include!("scene_impl.rs");
include!("util.rs");
