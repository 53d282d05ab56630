mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopStats;
pub use rendering::{
    window_to_world, world_to_screen, FrameTarget, MissingAsset, RecordingTarget, RenderTarget,
    Renderer, ScreenPoint, ScreenRect,
};
pub use scene::{
    Camera, InputSnapshot, Scene, SceneCommand, SceneKey, SceneWorld, CAMERA_LAG,
};
