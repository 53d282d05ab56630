use std::f32::consts::PI;

use crate::assets::SpriteId;

use super::animation::AnimationLibrary;
use super::body::{ActionState, BodyContext, BodyKind, PhysicsBody};
use super::effects::{Effect, EffectQueue, SoundCue};
use super::geometry::{Rect, Vec2};
use super::projectile::{Projectile, PROJECTILE_SPEED};

pub const ENEMY_SIZE: (u32, u32) = (8, 15);
pub const WALK_SPEED: f32 = 0.5;
pub const WALK_START_CHANCE: f32 = 0.01;
pub const WALK_TICKS: std::ops::RangeInclusive<u32> = 30..=120;
/// Ledge probe relative to the box: ahead of the centre, just below the feet.
pub const LEDGE_PROBE: (f32, f32) = (7.0, 23.0);
/// Vertical distance inside which the enemy will shoot at the player.
pub const SIGHT_BAND: f32 = 16.0;
pub const MUZZLE_OFFSET: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyOutcome {
    Alive,
    /// Dashed through by the player; remove from the roster.
    Killed,
}

/// What an enemy needs to know about the player this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub rect: Rect,
    pub dash_kills: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: PhysicsBody,
    /// Remaining patrol ticks; 0 while standing.
    pub walking: u32,
}

impl Enemy {
    pub fn new(position: Vec2, animations: &AnimationLibrary<SpriteId>) -> Self {
        Self {
            body: PhysicsBody::new(BodyKind::Enemy, position, ENEMY_SIZE, animations),
            walking: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(
        &mut self,
        ctx: BodyContext<'_>,
        player: &PlayerView,
        rng: &mut fastrand::Rng,
        effects: &mut EffectQueue,
    ) -> EnemyOutcome {
        let mut movement = Vec2::ZERO;

        if self.walking > 0 {
            let center = self.rect().center();
            let probe = Vec2::new(
                center.x + if self.body.flip { -LEDGE_PROBE.0 } else { LEDGE_PROBE.0 },
                self.body.position.y + LEDGE_PROBE.1,
            );
            if ctx.tilemap.solid_check(probe).is_some() {
                if self.body.collisions.horizontal() {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x = if self.body.flip { -WALK_SPEED } else { WALK_SPEED };
                }
            } else {
                self.body.flip = !self.body.flip;
            }

            self.walking -= 1;
            if self.walking == 0 {
                self.try_shoot(player, effects);
            }
        } else if rng.f32() < WALK_START_CHANCE {
            self.walking = rng.u32(WALK_TICKS);
        }

        self.body.step(ctx, movement);

        let action = if movement.x != 0.0 {
            ActionState::Run
        } else {
            ActionState::Idle
        };
        self.body.set_action(action, ctx.animations);

        if player.dash_kills && self.rect().overlaps(&player.rect) {
            let center = self.rect().center();
            effects.emit(Effect::ScreenShake(16));
            effects.emit(Effect::Sound(SoundCue::Hit));
            effects.emit(Effect::Sparks {
                origin: center,
                base_angle: 0.0,
                count: 30,
                jitter: PI,
            });
            effects.emit(Effect::Burst {
                origin: center,
                count: 30,
            });
            for base_angle in [0.0, PI] {
                effects.emit(Effect::Sparks {
                    origin: center,
                    base_angle,
                    count: 1,
                    jitter: 0.0,
                });
            }
            return EnemyOutcome::Killed;
        }

        EnemyOutcome::Alive
    }

    fn try_shoot(&self, player: &PlayerView, effects: &mut EffectQueue) {
        let dx = player.position.x - self.body.position.x;
        let dy = player.position.y - self.body.position.y;
        if dy.abs() >= SIGHT_BAND {
            return;
        }

        let facing_left = self.body.flip;
        if (facing_left && dx < 0.0) || (!facing_left && dx > 0.0) {
            let center = self.rect().center();
            let sign = if facing_left { -1.0 } else { 1.0 };
            let muzzle = Vec2::new(center.x + sign * MUZZLE_OFFSET, center.y);
            effects.emit(Effect::Sound(SoundCue::Shoot));
            effects.emit(Effect::SpawnProjectile(Projectile::new(
                muzzle,
                sign * PROJECTILE_SPEED,
            )));
            effects.emit(Effect::Sparks {
                origin: muzzle,
                base_angle: if facing_left { PI } else { 0.0 },
                count: 4,
                jitter: 0.5,
            });
        }
    }
}
