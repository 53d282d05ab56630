use std::collections::VecDeque;

use super::geometry::Vec2;
use super::projectile::Projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Dash,
    Hit,
    Shoot,
    /// Background loop started with the level.
    Ambience,
}

impl SoundCue {
    pub const fn name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Dash => "dash",
            SoundCue::Hit => "hit",
            SoundCue::Shoot => "shoot",
            SoundCue::Ambience => "ambience",
        }
    }
}

/// Fire-and-forget request emitted by simulation code and consumed by the
/// scene that owns the cosmetic systems.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Sound(SoundCue),
    /// Raise the screenshake to at least this many ticks.
    ScreenShake(u32),
    /// `count` sparks fanned around `base_angle` (radians) with up to
    /// `jitter` radians of random spread.
    Sparks {
        origin: Vec2,
        base_angle: f32,
        count: u32,
        jitter: f32,
    },
    /// Radial particle burst.
    Burst { origin: Vec2, count: u32 },
    /// Single trail particle left behind a dashing body.
    DashTrail { origin: Vec2, direction: f32 },
    /// Leaf drifting down from a tree canopy.
    Leaf { origin: Vec2 },
    SpawnProjectile(Projectile),
}

#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: VecDeque<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, effect: Effect) {
        self.pending.push_back(effect);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Effect> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_yields_in_emit_order_and_empties_queue() {
        let mut queue = EffectQueue::new();
        queue.emit(Effect::Sound(SoundCue::Jump));
        queue.emit(Effect::ScreenShake(16));

        let drained = queue.drain().collect::<Vec<_>>();

        assert_eq!(
            drained,
            vec![Effect::Sound(SoundCue::Jump), Effect::ScreenShake(16)]
        );
        assert!(queue.is_empty());
    }
}
