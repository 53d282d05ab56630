use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::assets::{AssetStore, LoadedSprite, SpriteId};
use crate::world::{TileKind, DEFAULT_TILE_SIZE};

use super::target::{RenderTarget, ScreenPoint, ScreenRect};

const CLEAR_COLOR: [u8; 4] = [14, 17, 28, 255];
const TILE_FALLBACK_DECOR_COLOR: [u8; 4] = [96, 138, 74, 255];
const TILE_FALLBACK_LARGE_DECOR_COLOR: [u8; 4] = [58, 98, 52, 255];
const TILE_FALLBACK_GRASS_COLOR: [u8; 4] = [74, 112, 56, 255];
const TILE_FALLBACK_STONE_COLOR: [u8; 4] = [110, 110, 118, 255];
const TILE_FALLBACK_SPAWNER_COLOR: [u8; 4] = [220, 90, 200, 255];
const SPRITE_FALLBACK_COLOR: [u8; 4] = [220, 220, 240, 255];
const SPRITE_FALLBACK_SIZE: (u32, u32) = (8, 8);

/// An image the renderer had to replace with a flat fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingAsset {
    Tile(TileKind, usize),
    Sprite(SpriteId),
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile(kind, variant) => write!(f, "tiles/{}/{variant}", kind.name()),
            Self::Sprite(sprite) => write!(f, "sprite#{}", sprite.0),
        }
    }
}

/// Presents a fixed-size display buffer scaled into the window.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    display_size: (u32, u32),
    assets: Arc<AssetStore>,
    warned_missing: HashSet<MissingAsset>,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        display_size: (u32, u32),
        assets: Arc<AssetStore>,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), display_size, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            display_size,
            assets,
            warned_missing: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), self.display_size, width, height)?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        display_size: (u32, u32),
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(display_size.0, display_size.1, surface)
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }

    /// Clears the display, lets `draw` fill it, then presents.
    pub fn render_frame<F>(&mut self, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn RenderTarget),
    {
        let (width, height) = self.display_size;
        {
            let mut target = FrameTarget::new(
                self.pixels.frame_mut(),
                width,
                height,
                &self.assets,
                &mut self.warned_missing,
            );
            target.clear(CLEAR_COLOR);
            draw(&mut target);
        }
        self.pixels.render()
    }
}

/// Software compositor over an RGBA frame.
pub struct FrameTarget<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    assets: &'a AssetStore,
    warned_missing: &'a mut HashSet<MissingAsset>,
}

impl<'a> FrameTarget<'a> {
    pub fn new(
        frame: &'a mut [u8],
        width: u32,
        height: u32,
        assets: &'a AssetStore,
        warned_missing: &'a mut HashSet<MissingAsset>,
    ) -> Self {
        Self {
            frame,
            width,
            height,
            assets,
            warned_missing,
        }
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn warn_missing_once(&mut self, missing: MissingAsset) {
        if self.warned_missing.insert(missing) {
            warn!(sprite_key = %missing, "sprite_missing_using_fallback");
        }
    }
}

impl RenderTarget for FrameTarget<'_> {
    fn view_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_tile(&mut self, kind: TileKind, variant: usize, dest: ScreenPoint, alpha: u8) {
        let assets = self.assets;
        match assets.tile_sprite(kind, variant) {
            Some(sprite) => {
                blit_sprite(self.frame, self.width, self.height, sprite, dest, false, alpha)
            }
            None => {
                self.warn_missing_once(MissingAsset::Tile(kind, variant));
                let mut color = tile_fallback_color(kind);
                color[3] = alpha;
                fill_rect_blended(
                    self.frame,
                    self.width,
                    self.height,
                    ScreenRect::new(dest.x, dest.y, DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE),
                    color,
                );
            }
        }
    }

    fn draw_sprite(&mut self, sprite: SpriteId, dest: ScreenPoint, flip_x: bool) {
        let assets = self.assets;
        match assets.sprite(sprite) {
            Some(loaded) => blit_sprite(
                self.frame,
                self.width,
                self.height,
                loaded,
                dest,
                flip_x,
                u8::MAX,
            ),
            None => {
                self.warn_missing_once(MissingAsset::Sprite(sprite));
                fill_rect_blended(
                    self.frame,
                    self.width,
                    self.height,
                    ScreenRect::new(
                        dest.x,
                        dest.y,
                        SPRITE_FALLBACK_SIZE.0,
                        SPRITE_FALLBACK_SIZE.1,
                    ),
                    SPRITE_FALLBACK_COLOR,
                );
            }
        }
    }

    fn sprite_size(&self, sprite: SpriteId) -> Option<(u32, u32)> {
        self.assets.sprite_size(sprite)
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: [u8; 4]) {
        fill_rect_blended(self.frame, self.width, self.height, rect, color);
    }
}

fn tile_fallback_color(kind: TileKind) -> [u8; 4] {
    match kind {
        TileKind::Decor => TILE_FALLBACK_DECOR_COLOR,
        TileKind::LargeDecor => TILE_FALLBACK_LARGE_DECOR_COLOR,
        TileKind::Grass => TILE_FALLBACK_GRASS_COLOR,
        TileKind::Stone => TILE_FALLBACK_STONE_COLOR,
        TileKind::Spawners => TILE_FALLBACK_SPAWNER_COLOR,
    }
}

/// Clips `[start, start + len)` against `[0, limit)`.
fn clip_span(start: i32, len: u32, limit: u32) -> Option<(usize, usize)> {
    let begin = start.max(0);
    let end = (start + len as i32).min(limit as i32);
    (begin < end).then_some((begin as usize, end as usize))
}

fn blend_pixel(dst: &mut [u8], src: [u8; 3], alpha: u8) {
    if alpha == u8::MAX {
        dst[..3].copy_from_slice(&src);
        dst[3] = u8::MAX;
        return;
    }
    let a = alpha as u32;
    for channel in 0..3 {
        let blended = (src[channel] as u32 * a + dst[channel] as u32 * (255 - a)) / 255;
        dst[channel] = blended as u8;
    }
}

fn fill_rect_blended(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    if color[3] == 0 {
        return;
    }
    let (Some((x0, x1)), Some((y0, y1))) = (
        clip_span(rect.x, rect.w, width),
        clip_span(rect.y, rect.h, height),
    ) else {
        return;
    };
    let stride = width as usize * 4;
    for y in y0..y1 {
        let row = &mut frame[y * stride..(y + 1) * stride];
        for x in x0..x1 {
            blend_pixel(&mut row[x * 4..x * 4 + 4], [color[0], color[1], color[2]], color[3]);
        }
    }
}

fn blit_sprite(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &LoadedSprite,
    dest: ScreenPoint,
    flip_x: bool,
    alpha: u8,
) {
    if sprite.width == 0 || sprite.height == 0 || alpha == 0 {
        return;
    }
    if sprite.rgba.len() < sprite.width as usize * sprite.height as usize * 4 {
        return;
    }
    let (Some((x0, x1)), Some((y0, y1))) = (
        clip_span(dest.x, sprite.width, width),
        clip_span(dest.y, sprite.height, height),
    ) else {
        return;
    };

    let stride = width as usize * 4;
    let sprite_stride = sprite.width as usize * 4;
    for out_y in y0..y1 {
        let src_y = (out_y as i32 - dest.y) as usize;
        let src_row = &sprite.rgba[src_y * sprite_stride..(src_y + 1) * sprite_stride];
        let dst_row = &mut frame[out_y * stride..(out_y + 1) * stride];
        for out_x in x0..x1 {
            let mut src_x = (out_x as i32 - dest.x) as usize;
            if flip_x {
                src_x = sprite.width as usize - 1 - src_x;
            }
            let src = &src_row[src_x * 4..src_x * 4 + 4];
            if src[3] == 0 {
                continue;
            }
            let effective = (src[3] as u32 * alpha as u32 / 255) as u8;
            blend_pixel(
                &mut dst_row[out_x * 4..out_x * 4 + 4],
                [src[0], src[1], src[2]],
                effective,
            );
        }
    }
}
