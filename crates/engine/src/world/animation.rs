use std::collections::HashMap;
use std::sync::Arc;

use super::body::{ActionState, BodyKind};

/// Frame cursor over a shared, immutable frame list.
///
/// Cloning copies the cursor and bumps the `Arc`; the frames themselves are
/// never duplicated.
#[derive(Debug, Clone)]
pub struct Animation<F> {
    frames: Arc<[F]>,
    frame_duration: u32,
    looping: bool,
    frame: u32,
    done: bool,
}

impl<F> Animation<F> {
    pub fn new(frames: impl Into<Arc<[F]>>, frame_duration: u32, looping: bool) -> Self {
        Self {
            frames: frames.into(),
            frame_duration: frame_duration.max(1),
            looping,
            frame: 0,
            done: false,
        }
    }

    /// Fresh cursor at frame 0 sharing this animation's frames.
    pub fn instance(&self) -> Self {
        Self {
            frames: Arc::clone(&self.frames),
            frame_duration: self.frame_duration,
            looping: self.looping,
            frame: 0,
            done: false,
        }
    }

    fn span(&self) -> u32 {
        self.frame_duration * self.frames.len() as u32
    }

    pub fn update(&mut self) {
        let span = self.span();
        if span == 0 {
            return;
        }
        if self.looping {
            self.frame = (self.frame + 1) % span;
        } else {
            self.frame = (self.frame + 1).min(span - 1);
            if self.frame >= span - 1 {
                self.done = true;
            }
        }
    }

    pub fn current(&self) -> Option<&F> {
        self.frames.get(self.frame_index())
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Index into the frame list for the current tick.
    pub fn frame_index(&self) -> usize {
        (self.frame / self.frame_duration) as usize
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn shares_frames_with(&self, other: &Animation<F>) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}

impl<F> Default for Animation<F> {
    fn default() -> Self {
        Self::new(Vec::new(), 1, true)
    }
}

/// Ticks per image when no override is registered.
pub const fn default_frame_duration(kind: BodyKind, action: ActionState) -> u32 {
    match (kind, action) {
        (_, ActionState::Idle) => 6,
        (_, ActionState::Run) => 4,
        _ => 5,
    }
}

/// Animation templates keyed by body kind and action.
#[derive(Debug, Clone)]
pub struct AnimationLibrary<F> {
    templates: HashMap<(BodyKind, ActionState), Animation<F>>,
}

impl<F> Default for AnimationLibrary<F> {
    fn default() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }
}

impl<F> AnimationLibrary<F> {
    pub fn insert(&mut self, kind: BodyKind, action: ActionState, template: Animation<F>) {
        self.templates.insert((kind, action), template);
    }

    pub fn template(&self, kind: BodyKind, action: ActionState) -> Option<&Animation<F>> {
        self.templates.get(&(kind, action))
    }

    /// New cursor for `(kind, action)`, or an empty animation when the pair
    /// has no frames loaded.
    pub fn instance(&self, kind: BodyKind, action: ActionState) -> Animation<F> {
        self.template(kind, action)
            .map(Animation::instance)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
