use crate::world::Vec2;

use super::target::ScreenPoint;

/// World pixel to display pixel for a camera scrolled to `camera`.
pub fn world_to_screen(world: Vec2, camera: (i32, i32)) -> ScreenPoint {
    ScreenPoint::new(
        world.x.floor() as i32 - camera.0,
        world.y.floor() as i32 - camera.1,
    )
}

/// Window pixel (e.g. a cursor position) to world pixel. The display is
/// stretched over the whole window, so each axis scales independently.
pub fn window_to_world(
    window_px: Vec2,
    window_size: (u32, u32),
    display_size: (u32, u32),
    camera: (i32, i32),
) -> Vec2 {
    let scale_x = display_size.0 as f32 / window_size.0.max(1) as f32;
    let scale_y = display_size.1 as f32 / window_size.1.max(1) as f32;
    Vec2::new(
        window_px.x * scale_x + camera.0 as f32,
        window_px.y * scale_y + camera.1 as f32,
    )
}
