use crate::assets::SpriteId;
use crate::world::TileKind;

/// Integer pixel position on the display surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Sink for draw calls. Callers compute destinations in display pixels;
/// implementations do the compositing.
pub trait RenderTarget {
    fn view_size(&self) -> (u32, u32);
    fn draw_tile(&mut self, kind: TileKind, variant: usize, dest: ScreenPoint, alpha: u8);
    fn draw_sprite(&mut self, sprite: SpriteId, dest: ScreenPoint, flip_x: bool);
    fn sprite_size(&self, sprite: SpriteId) -> Option<(u32, u32)>;
    fn fill_rect(&mut self, rect: ScreenRect, color: [u8; 4]);
}

/// Records draw calls instead of drawing. Used by scene tests.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub view: (u32, u32),
    pub tiles: Vec<(TileKind, usize, ScreenPoint)>,
    pub sprites: Vec<(SpriteId, ScreenPoint, bool)>,
    pub rects: Vec<(ScreenRect, [u8; 4])>,
}

impl RecordingTarget {
    pub fn new(view: (u32, u32)) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }
}

impl RenderTarget for RecordingTarget {
    fn view_size(&self) -> (u32, u32) {
        self.view
    }

    fn draw_tile(&mut self, kind: TileKind, variant: usize, dest: ScreenPoint, _alpha: u8) {
        self.tiles.push((kind, variant, dest));
    }

    fn draw_sprite(&mut self, sprite: SpriteId, dest: ScreenPoint, flip_x: bool) {
        self.sprites.push((sprite, dest, flip_x));
    }

    fn sprite_size(&self, _sprite: SpriteId) -> Option<(u32, u32)> {
        None
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: [u8; 4]) {
        self.rects.push((rect, color));
    }
}
