use super::geometry::{Rect, Vec2};
use super::player::DASH_ACTIVE_THRESHOLD;
use super::tilemap::Tilemap;

/// Ticks a projectile survives before it is discarded.
pub const PROJECTILE_LIFETIME: u32 = 360;
pub const PROJECTILE_SPEED: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Signed horizontal speed in pixels per tick.
    pub direction: f32,
    pub age: u32,
}

/// What a projectile hit (if anything) on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    Flying,
    HitWall,
    Expired,
    HitPlayer,
}

/// The parts of the player a projectile cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileTarget {
    pub rect: Rect,
    pub dashing: i32,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: f32) -> Self {
        Self {
            pos,
            direction,
            age: 0,
        }
    }

    /// Moves one tick and classifies the result. Anything other than
    /// `Flying` means the projectile should be removed. The target is
    /// `None` while the player is dead.
    pub fn advance(
        &mut self,
        tilemap: &Tilemap,
        target: Option<ProjectileTarget>,
    ) -> ProjectileOutcome {
        self.pos.x += self.direction;
        self.age += 1;

        if tilemap.solid_check(self.pos).is_some() {
            return ProjectileOutcome::HitWall;
        }
        if self.age > PROJECTILE_LIFETIME {
            return ProjectileOutcome::Expired;
        }
        match target {
            Some(target)
                if target.dashing.abs() < DASH_ACTIVE_THRESHOLD
                    && target.rect.contains_point(self.pos) =>
            {
                ProjectileOutcome::HitPlayer
            }
            _ => ProjectileOutcome::Flying,
        }
    }
}
