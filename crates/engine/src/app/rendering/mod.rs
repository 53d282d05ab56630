mod renderer;
mod target;
mod transform;

pub use renderer::{FrameTarget, MissingAsset, Renderer};
pub use target::{RecordingTarget, RenderTarget, ScreenPoint, ScreenRect};
pub use transform::{window_to_world, world_to_screen};
