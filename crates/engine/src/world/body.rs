use crate::assets::SpriteId;

use super::animation::{Animation, AnimationLibrary};
use super::geometry::{Rect, Vec2};
use super::tilemap::Tilemap;

pub const GRAVITY: f32 = 0.1;
pub const TERMINAL_VELOCITY: f32 = 5.0;
/// Sprites are drawn this far up and left of the collision box to leave
/// room for limbs in the run and slide frames.
pub const ANIM_OFFSET: (i32, i32) = (-3, -3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyKind {
    Player,
    Enemy,
}

impl BodyKind {
    pub const fn name(self) -> &'static str {
        match self {
            BodyKind::Player => "player",
            BodyKind::Enemy => "enemy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionState {
    Idle,
    Run,
    Jump,
    Slide,
    WallSlide,
}

impl ActionState {
    pub const ALL: [ActionState; 5] = [
        ActionState::Idle,
        ActionState::Run,
        ActionState::Jump,
        ActionState::Slide,
        ActionState::WallSlide,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Run => "run",
            ActionState::Jump => "jump",
            ActionState::Slide => "slide",
            ActionState::WallSlide => "wall_slide",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionFlags {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

/// Read-only world access handed to bodies for one step.
#[derive(Clone, Copy)]
pub struct BodyContext<'a> {
    pub tilemap: &'a Tilemap,
    pub animations: &'a AnimationLibrary<SpriteId>,
}

impl<'a> BodyContext<'a> {
    pub fn new(tilemap: &'a Tilemap, animations: &'a AnimationLibrary<SpriteId>) -> Self {
        Self {
            tilemap,
            animations,
        }
    }
}

/// Axis-aligned box with velocity that collides against on-grid tiles.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub kind: BodyKind,
    pub position: Vec2,
    pub size: (u32, u32),
    pub velocity: Vec2,
    pub collisions: CollisionFlags,
    pub flip: bool,
    pub last_movement: Vec2,
    action: ActionState,
    animation: Animation<SpriteId>,
}

impl PhysicsBody {
    pub fn new(
        kind: BodyKind,
        position: Vec2,
        size: (u32, u32),
        animations: &AnimationLibrary<SpriteId>,
    ) -> Self {
        Self {
            kind,
            position,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::default(),
            flip: false,
            last_movement: Vec2::ZERO,
            action: ActionState::Idle,
            animation: animations.instance(kind, ActionState::Idle),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.size.0 as f32,
            self.size.1 as f32,
        )
    }

    pub fn action(&self) -> ActionState {
        self.action
    }

    pub fn animation(&self) -> &Animation<SpriteId> {
        &self.animation
    }

    /// Switches animation only on an actual change so the cursor keeps
    /// running while the action holds.
    pub fn set_action(&mut self, action: ActionState, animations: &AnimationLibrary<SpriteId>) {
        if action != self.action {
            self.action = action;
            self.animation = animations.instance(self.kind, action);
        }
    }

    /// One simulation tick: X then Y collision resolution, facing, gravity,
    /// animation.
    pub fn step(&mut self, ctx: BodyContext<'_>, movement: Vec2) {
        self.collisions = CollisionFlags::default();
        let frame_movement = Vec2::new(
            movement.x + self.velocity.x,
            movement.y + self.velocity.y,
        );

        self.position.x += frame_movement.x;
        let mut rect = self.rect();
        for obstacle in ctx.tilemap.physics_rects_around(self.position) {
            if rect.overlaps(&obstacle) {
                if frame_movement.x > 0.0 {
                    rect.set_right(obstacle.left());
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.x = obstacle.right();
                    self.collisions.left = true;
                }
                self.position.x = rect.x;
            }
        }

        self.position.y += frame_movement.y;
        let mut rect = self.rect();
        for obstacle in ctx.tilemap.physics_rects_around(self.position) {
            if rect.overlaps(&obstacle) {
                if frame_movement.y > 0.0 {
                    rect.set_bottom(obstacle.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.y = obstacle.bottom();
                    self.collisions.up = true;
                }
                self.position.y = rect.y;
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        self.last_movement = movement;

        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
        if self.collisions.vertical() {
            self.velocity.y = 0.0;
        }

        self.animation.update();
    }

    /// Sprite destination for a camera scrolled to `camera`.
    pub fn sprite_origin(&self, camera: (i32, i32)) -> (i32, i32) {
        (
            self.position.x as i32 - camera.0 + ANIM_OFFSET.0,
            self.position.y as i32 - camera.1 + ANIM_OFFSET.1,
        )
    }
}
