use crate::assets::SpriteId;

use super::animation::AnimationLibrary;
use super::body::{ActionState, BodyContext, BodyKind, PhysicsBody};
use super::effects::{Effect, EffectQueue};
use super::geometry::{Rect, Vec2};

pub const PLAYER_SIZE: (u32, u32) = (8, 15);
pub const MAX_JUMPS: u32 = 1;
/// Airborne ticks after which the player counts as fallen out of the level.
pub const FALL_DEATH_AIR_TIME: u32 = 180;
pub const DASH_TICKS: i32 = 60;
/// `|dashing|` above this means the dash is still in its fast phase.
pub const DASH_ACTIVE_THRESHOLD: i32 = 50;
pub const DASH_SPEED: f32 = 8.0;
pub const JUMP_VELOCITY: f32 = -3.0;
pub const WALL_JUMP_VELOCITY: Vec2 = Vec2::new(3.5, -2.5);
pub const WALL_SLIDE_MAX_FALL: f32 = 0.5;
pub const HORIZONTAL_DRAG: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    Alive,
    /// Airborne for too long; the driver starts the death sequence.
    FellOut,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Signed dash countdown, sign is the dash direction.
    pub dashing: i32,
}

impl Player {
    pub fn new(position: Vec2, animations: &AnimationLibrary<SpriteId>) -> Self {
        Self {
            body: PhysicsBody::new(BodyKind::Player, position, PLAYER_SIZE, animations),
            air_time: 0,
            jumps: MAX_JUMPS,
            wall_slide: false,
            dashing: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(
        &mut self,
        ctx: BodyContext<'_>,
        movement: Vec2,
        effects: &mut EffectQueue,
    ) -> PlayerOutcome {
        self.body.step(ctx, movement);

        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = MAX_JUMPS;
        } else {
            self.air_time += 1;
        }

        let outcome = if self.air_time > FALL_DEATH_AIR_TIME {
            effects.emit(Effect::ScreenShake(16));
            PlayerOutcome::FellOut
        } else {
            PlayerOutcome::Alive
        };

        if self.body.collisions.horizontal() && self.air_time >= 5 {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_MAX_FALL);
            self.body.flip = !self.body.collisions.right;
            self.body.set_action(ActionState::WallSlide, ctx.animations);
        } else {
            self.wall_slide = false;
        }

        if !self.wall_slide {
            let action = if self.air_time >= 5 {
                ActionState::Jump
            } else if movement.x != 0.0 {
                ActionState::Run
            } else {
                ActionState::Idle
            };
            self.body.set_action(action, ctx.animations);
        }

        let magnitude = self.dashing.abs();
        let direction = self.dashing.signum() as f32;
        if magnitude > DASH_ACTIVE_THRESHOLD {
            self.body.velocity.x = direction * DASH_SPEED;
        } else if magnitude == DASH_ACTIVE_THRESHOLD {
            self.body.velocity.x *= 0.1;
        }

        let center = self.rect().center();
        if magnitude > DASH_ACTIVE_THRESHOLD && magnitude < DASH_TICKS {
            effects.emit(Effect::DashTrail {
                origin: center,
                direction,
            });
        } else if magnitude == DASH_ACTIVE_THRESHOLD || magnitude == DASH_TICKS {
            effects.emit(Effect::Burst {
                origin: center,
                count: 20,
            });
        }

        if self.dashing > 0 {
            self.dashing -= 1;
        } else if self.dashing < 0 {
            self.dashing += 1;
        }

        let vx = self.body.velocity.x;
        if vx > 0.0 {
            self.body.velocity.x = (vx - HORIZONTAL_DRAG).max(0.0);
        } else if vx < 0.0 {
            self.body.velocity.x = (vx + HORIZONTAL_DRAG).min(0.0);
        }

        outcome
    }

    /// Returns whether the jump input was accepted. A wall-sliding player
    /// always accepts it, but only kicks off the wall when the last intent
    /// pushed into the wall.
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            let into_left_wall = self.body.flip && self.body.last_movement.x < 0.0;
            let into_right_wall = !self.body.flip && self.body.last_movement.x > 0.0;
            if into_left_wall || into_right_wall {
                let away = if into_left_wall { 1.0 } else { -1.0 };
                self.body.velocity.x = away * WALL_JUMP_VELOCITY.x;
                self.body.velocity.y = WALL_JUMP_VELOCITY.y;
                self.air_time = 5;
                self.jumps = self.jumps.saturating_sub(1);
            }
            return true;
        }

        if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = 5;
            return true;
        }
        false
    }

    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip { -DASH_TICKS } else { DASH_TICKS };
        true
    }

    /// Hidden during the fast phase of a dash.
    pub fn is_visible(&self) -> bool {
        self.dashing.abs() <= DASH_ACTIVE_THRESHOLD
    }

    /// Whether an overlapping enemy dies from contact this tick.
    pub fn dash_kills(&self) -> bool {
        self.dashing.abs() >= DASH_ACTIVE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GridPos, Tile, TileKind, Tilemap};

    fn floor_map() -> Tilemap {
        let mut map = Tilemap::default();
        for x in -4..8 {
            map.place(Tile::new(TileKind::Grass, 1, GridPos::new(x, 2)));
        }
        map
    }

    /// Player standing on the floor at y = 32.
    fn grounded_player(map: &Tilemap, library: &AnimationLibrary<SpriteId>) -> Player {
        let mut player = Player::new(Vec2::new(20.0, 17.0), library);
        let mut effects = EffectQueue::new();
        player.update(BodyContext::new(map, library), Vec2::ZERO, &mut effects);
        player.update(BodyContext::new(map, library), Vec2::ZERO, &mut effects);
        assert!(player.body.collisions.down);
        player
    }

    #[test]
    fn wall_clamp_keeps_velocity_and_drag_still_applies() {
        let mut map = floor_map();
        let wall = Tile::new(TileKind::Stone, 1, GridPos::new(3, 1));
        map.place(wall);
        let wall_left = map.cell_rect(wall.pos).left();
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::new(wall_left - 8.0, 17.0), &library);
        player.body.velocity.x = 5.0;
        let mut effects = EffectQueue::new();

        player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);

        assert_eq!(player.rect().right(), wall_left);
        assert!(player.body.collisions.right);
        assert!((player.body.velocity.x - 4.9).abs() < 1e-5);

        player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);

        assert_eq!(player.rect().right(), wall_left);
        assert!((player.body.velocity.x - 4.8).abs() < 1e-5);
    }

    #[test]
    fn grounded_player_has_exactly_one_jump() {
        let map = floor_map();
        let library = AnimationLibrary::default();
        let mut player = grounded_player(&map, &library);
        let mut effects = EffectQueue::new();

        assert_eq!(player.jumps, 1);
        assert!(player.jump());
        assert_eq!(player.body.velocity.y, JUMP_VELOCITY);
        assert_eq!(player.air_time, 5);

        player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);
        assert!(!player.body.collisions.down);
        assert!(!player.jump());

        for _ in 0..200 {
            player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);
            if player.body.collisions.down {
                break;
            }
        }
        assert!(player.body.collisions.down);
        assert_eq!(player.jumps, 1);
        assert!(player.jump());
    }

    #[test]
    fn dash_counts_down_to_zero_without_velocity_overshoot() {
        let map = Tilemap::default();
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::new(0.0, 0.0), &library);
        let mut effects = EffectQueue::new();

        assert!(player.dash());
        assert_eq!(player.dashing, DASH_TICKS);
        assert!(!player.dash());

        let mut previous_vx = f32::MAX;
        for tick in 0..60 {
            player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);
            assert!(player.body.velocity.x >= 0.0, "tick {tick}");
            if tick >= 10 {
                assert!(player.body.velocity.x <= previous_vx);
            }
            previous_vx = player.body.velocity.x;
        }

        assert_eq!(player.dashing, 0);
        assert_eq!(player.body.velocity.x, 0.0);
    }

    #[test]
    fn dash_direction_follows_facing_and_hides_player() {
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::ZERO, &library);
        player.body.flip = true;

        assert!(player.dash());
        assert_eq!(player.dashing, -DASH_TICKS);
        assert!(!player.is_visible());
        assert!(player.dash_kills());

        player.dashing = -DASH_ACTIVE_THRESHOLD;
        assert!(player.is_visible());
        assert!(player.dash_kills());

        player.dashing = -49;
        assert!(!player.dash_kills());
    }

    #[test]
    fn dash_emits_bursts_at_both_ends_and_trail_between() {
        let map = Tilemap::default();
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::ZERO, &library);
        let mut effects = EffectQueue::new();
        player.dash();

        for _ in 0..11 {
            player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);
        }

        let drained = effects.drain().collect::<Vec<_>>();
        let bursts = drained
            .iter()
            .filter(|effect| matches!(effect, Effect::Burst { count: 20, .. }))
            .count();
        let trails = drained
            .iter()
            .filter(|effect| matches!(effect, Effect::DashTrail { .. }))
            .count();
        assert_eq!(bursts, 2);
        assert_eq!(trails, 9);
    }

    #[test]
    fn long_fall_reports_fell_out() {
        let map = Tilemap::default();
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::ZERO, &library);
        let mut effects = EffectQueue::new();

        let mut outcome = PlayerOutcome::Alive;
        for _ in 0..=FALL_DEATH_AIR_TIME {
            outcome = player.update(BodyContext::new(&map, &library), Vec2::ZERO, &mut effects);
        }

        assert_eq!(outcome, PlayerOutcome::FellOut);
        assert!(effects
            .iter()
            .any(|effect| *effect == Effect::ScreenShake(16)));
    }

    #[test]
    fn wall_slide_caps_fall_and_wall_jump_pushes_away() {
        let mut map = Tilemap::default();
        for y in -6..6 {
            map.place(Tile::new(TileKind::Stone, 0, GridPos::new(2, y)));
        }
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::new(24.0, 0.0), &library);
        let mut effects = EffectQueue::new();
        player.air_time = 10;
        player.body.velocity.y = 3.0;

        player.update(
            BodyContext::new(&map, &library),
            Vec2::new(1.0, 0.0),
            &mut effects,
        );

        assert!(player.wall_slide);
        assert!(player.body.collisions.right);
        assert!(!player.body.flip);
        assert_eq!(player.body.velocity.y, WALL_SLIDE_MAX_FALL);
        assert_eq!(player.body.action(), ActionState::WallSlide);

        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::new(-3.5, -2.5));
        assert_eq!(player.jumps, 0);
    }

    #[test]
    fn wall_jump_without_push_into_wall_is_accepted_but_inert() {
        let library = AnimationLibrary::default();
        let mut player = Player::new(Vec2::ZERO, &library);
        player.wall_slide = true;
        player.body.flip = false;
        player.body.last_movement = Vec2::ZERO;

        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::ZERO);
        assert_eq!(player.jumps, 1);
    }
}
