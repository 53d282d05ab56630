mod animation;
mod body;
mod effects;
mod enemy;
mod foliage;
mod geometry;
mod level;
mod player;
mod projectile;
mod tile;
mod tilemap;

pub use animation::{default_frame_duration, Animation, AnimationLibrary};
pub use body::{
    ActionState, BodyContext, BodyKind, CollisionFlags, PhysicsBody, ANIM_OFFSET, GRAVITY,
    TERMINAL_VELOCITY,
};
pub use effects::{Effect, EffectQueue, SoundCue};
pub use enemy::{Enemy, EnemyOutcome, PlayerView, ENEMY_SIZE};
pub use foliage::{LeafSpawner, TREE_VARIANT};
pub use geometry::{GridPos, Rect, Vec2};
pub use level::{grid_key, parse_grid_key, LevelError};
pub use player::{
    Player, PlayerOutcome, DASH_ACTIVE_THRESHOLD, DASH_TICKS, FALL_DEATH_AIR_TIME, PLAYER_SIZE,
};
pub use projectile::{
    Projectile, ProjectileOutcome, ProjectileTarget, PROJECTILE_LIFETIME, PROJECTILE_SPEED,
};
pub use tile::{
    ExtractedTile, OffgridTile, Tile, TileKind, SPAWNER_ENEMY_VARIANT, SPAWNER_PLAYER_VARIANT,
};
pub use tilemap::{autotile_variant, Tilemap, DEFAULT_TILE_SIZE};
