use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::assets::AssetStore;
use crate::world::Vec2;
use crate::StartupError;

use super::input::{ActionStates, InputEdges, KeyEdge};
use super::metrics::{FrameStats, LoopStats};
use super::scene::SceneMachine;
use super::{InputAction, InputSnapshot, Renderer, Scene, SceneCommand, SceneKey};

pub const SLOW_FRAME_ENV_VAR: &str = "NINJA_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Size of the pixel buffer the scenes draw into; scaled to the window.
    pub display_width: u32,
    pub display_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
    pub start_scene: SceneKey,
    pub images_dir: PathBuf,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Ninja Game".to_string(),
            window_width: 640,
            window_height: 480,
            display_width: 320,
            display_height: 240,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
            start_scene: SceneKey::Game,
            images_dir: PathBuf::from("data").join("images"),
        }
    }
}

impl LoopConfig {
    fn display_size(&self) -> (u32, u32) {
        (self.display_width.max(1), self.display_height.max(1))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the window and runs both scenes until the window closes or Escape
/// is pressed.
pub fn run_app(
    config: LoopConfig,
    game: Box<dyn Scene>,
    editor: Box<dyn Scene>,
) -> Result<(), AppError> {
    let display_size = config.display_size();
    let assets = Arc::new(AssetStore::load(&config.images_dir));
    info!(
        images_dir = %config.images_dir.display(),
        sprite_count = assets.sprite_count(),
        display_width = display_size.0,
        display_height = display_size.1,
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = Renderer::new(Arc::clone(&window), display_size, Arc::clone(&assets))
        .map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let timing = LoopTiming::from_config(&config, env::var(SLOW_FRAME_ENV_VAR).ok());
    info!(
        target_tps = config.target_tps.max(1),
        max_ticks_per_frame = timing.max_ticks_per_frame,
        max_frame_delta_ms = timing.max_frame_delta.as_millis() as u64,
        slow_frame_delay_ms = timing.slow_frame_delay.as_millis() as u64,
        render_cap = ?config.max_render_fps.filter(|fps| *fps > 0),
        "loop_config"
    );

    let mut scenes = SceneMachine::new(game, editor, config.start_scene);
    scenes.set_assets_for_all(assets);
    scenes.set_display_size_for_all(display_size);
    scenes.load_active();

    let window_size = window.inner_size();
    let now = Instant::now();
    let mut state = LoopState {
        window,
        renderer,
        scenes,
        input: InputCollector::new(window_size.width, window_size.height),
        stats: FrameStats::new(timing.stats_window, now),
        last_stats: LoopStats::default(),
        step: FixedStep::default(),
        timing,
        base_title: config.window_title,
        applied_title: None,
        last_frame: now,
        last_present: now,
    };

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                if !state.handle_window_event(event) {
                    window_target.exit();
                }
            }
            Event::AboutToWait => state.window.request_redraw(),
            Event::LoopExiting => {
                state.scenes.shutdown_all();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Everything the event loop closure owns between callbacks.
struct LoopState {
    window: Arc<Window>,
    renderer: Renderer,
    scenes: SceneMachine,
    input: InputCollector,
    stats: FrameStats,
    last_stats: LoopStats,
    step: FixedStep,
    timing: LoopTiming,
    base_title: String,
    applied_title: Option<String>,
    last_frame: Instant,
    last_present: Instant,
}

impl LoopState {
    /// Returns false once the loop should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                info!(reason = "window_close", "shutdown_requested");
                return false;
            }
            WindowEvent::Resized(size) => return self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.window.inner_size();
                return self.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .set_cursor_position_px(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => self.input.clear_cursor_position(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_input(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => self.input.handle_mouse_wheel(delta),
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.handle_keyboard_input(&event);
                if self.input.quit_requested {
                    info!(reason = "escape_key", "shutdown_requested");
                    return false;
                }
            }
            WindowEvent::RedrawRequested => return self.redraw(),
            _ => {}
        }
        true
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        self.input.set_window_size(width, height);
        match self.renderer.resize(width, height) {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "renderer_resize_failed");
                false
            }
        }
    }

    fn redraw(&mut self) -> bool {
        if !self.timing.slow_frame_delay.is_zero() {
            thread::sleep(self.timing.slow_frame_delay);
        }

        let now = Instant::now();
        let frame_dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let plan = self.step.advance(frame_dt, &self.timing);
        for _ in 0..plan.ticks {
            self.run_tick();
        }
        if !plan.dropped.is_zero() {
            warn!(
                dropped_backlog_ms = plan.dropped.as_millis() as u64,
                max_ticks_per_frame = self.timing.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }

        let idle = self.timing.cap_sleep(now.saturating_duration_since(self.last_present));
        if !idle.is_zero() {
            thread::sleep(idle);
        }
        let scenes = &mut self.scenes;
        if let Err(error) = self.renderer.render_frame(|target| scenes.render_active(target)) {
            warn!(error = %error, "renderer_draw_failed");
            return false;
        }
        self.last_present = Instant::now();
        self.stats.frame(frame_dt);

        let busiest_frame = self.stats.busiest_frame();
        if let Some(stats) = self.stats.roll(now) {
            self.last_stats = stats;
            info!(
                fps = stats.fps,
                game_tps = stats.game_tps,
                editor_tps = stats.editor_tps,
                frame_time_ms = stats.frame_time_ms,
                busiest_frame_ms = busiest_frame.as_millis() as u64,
                scene = self.scenes.active_scene().name(),
                "loop_metrics"
            );
        }
        self.refresh_title();
        true
    }

    fn run_tick(&mut self) {
        let snapshot = self.input.snapshot_for_tick();
        let ticked = self.scenes.active_scene();
        let command = self
            .scenes
            .update_active(self.timing.fixed_dt.as_secs_f32(), &snapshot);
        self.stats.tick(ticked);

        let switched = match command {
            SceneCommand::None => false,
            SceneCommand::SwitchTo(next) => self.scenes.switch_to(next),
            SceneCommand::HardResetTo(next) => self.scenes.hard_reset_to(next),
        };
        if switched {
            info!(
                from = ticked.name(),
                to = self.scenes.active_scene().name(),
                "scene_switched"
            );
        }
    }

    fn refresh_title(&mut self) {
        let base = self
            .scenes
            .debug_title_active()
            .unwrap_or_else(|| self.base_title.clone());
        let title = format!("{base} | {}", self.last_stats.summary());
        if self.applied_title.as_deref() != Some(title.as_str()) {
            debug!(title = %title, "window_title");
            self.window.set_title(&title);
            self.applied_title = Some(title);
        }
    }
}

/// Fixed-step pacing derived from `LoopConfig`, with zero values replaced
/// by usable defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LoopTiming {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    stats_window: Duration,
    frame_cap: Option<Duration>,
    slow_frame_delay: Duration,
}

impl LoopTiming {
    /// `slow_frame_env` is the raw `NINJA_SLOW_FRAME_MS` value, if set. It
    /// overrides the config when it parses as milliseconds.
    fn from_config(config: &LoopConfig, slow_frame_env: Option<String>) -> Self {
        let non_zero = |value: Duration, fallback: Duration| {
            if value.is_zero() {
                fallback
            } else {
                value
            }
        };
        let slow_frame_ms = match slow_frame_env {
            None => config.simulated_slow_frame_ms,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = SLOW_FRAME_ENV_VAR, value = %raw, "invalid_slow_frame_ms");
                config.simulated_slow_frame_ms
            }),
        };

        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / config.target_tps.max(1) as f64),
            max_frame_delta: non_zero(config.max_frame_delta, Duration::from_millis(250)),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            stats_window: non_zero(config.metrics_log_interval, Duration::from_secs(1)),
            frame_cap: config
                .max_render_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            slow_frame_delay: Duration::from_millis(slow_frame_ms),
        }
    }

    /// Time left before the next present is allowed under the frame cap.
    fn cap_sleep(&self, since_last_present: Duration) -> Duration {
        self.frame_cap
            .map(|cap| cap.saturating_sub(since_last_present))
            .unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepPlan {
    ticks: u32,
    /// Simulation time thrown away because the per-frame tick cap was hit.
    dropped: Duration,
}

/// Accumulates wall time and hands it out in whole fixed ticks.
#[derive(Debug, Default)]
struct FixedStep {
    accumulator: Duration,
}

impl FixedStep {
    fn advance(&mut self, frame_dt: Duration, timing: &LoopTiming) -> StepPlan {
        self.accumulator += frame_dt.min(timing.max_frame_delta);

        let available = (self.accumulator.as_nanos() / timing.fixed_dt.as_nanos().max(1)) as u32;
        let ticks = available.min(timing.max_ticks_per_frame);
        self.accumulator -= timing.fixed_dt * ticks;

        if available > ticks {
            StepPlan {
                ticks,
                dropped: std::mem::take(&mut self.accumulator),
            }
        } else {
            StepPlan {
                ticks,
                dropped: Duration::ZERO,
            }
        }
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    switch_scene: KeyEdge,
    save: KeyEdge,
    jump: KeyEdge,
    dash: KeyEdge,
    toggle_grid: KeyEdge,
    autotile: KeyEdge,
    left_mouse: KeyEdge,
    right_mouse: KeyEdge,
    pending_scroll_steps: i32,
    cursor_position_px: Option<Vec2>,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        self.handle_physical_key(key_event.physical_key, key_event.state);
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.action_states.set(InputAction::MoveUp, is_pressed);
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.action_states.set(InputAction::MoveDown, is_pressed);
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.action_states.set(InputAction::MoveLeft, is_pressed);
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.action_states.set(InputAction::MoveRight, is_pressed);
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.action_states.set(InputAction::Modifier, is_pressed);
                if code == KeyCode::ShiftLeft {
                    self.dash.handle(state);
                }
            }
            KeyCode::Space => self.jump.handle(state),
            KeyCode::Tab => self.switch_scene.handle(state),
            KeyCode::F5 => self.save.handle(state),
            KeyCode::KeyG => self.toggle_grid.handle(state),
            KeyCode::KeyT => self.autotile.handle(state),
            KeyCode::Escape => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {}
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let edges = InputEdges {
            switch_scene: self.switch_scene.take(),
            save: self.save.take(),
            jump: self.jump.take(),
            dash: self.dash.take(),
            toggle_grid: self.toggle_grid.take(),
            autotile: self.autotile.take(),
            left_click: self.left_mouse.take(),
            right_click: self.right_mouse.take(),
        };
        let snapshot = InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            edges,
            self.cursor_position_px,
            self.left_mouse.is_down(),
            self.right_mouse.is_down(),
            self.pending_scroll_steps,
            self.window_width,
            self.window_height,
        );
        self.pending_scroll_steps = 0;
        snapshot
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2::new(x, y));
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = scroll_steps_from_delta(delta);
        self.pending_scroll_steps = self.pending_scroll_steps.saturating_add(steps);
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match button {
            MouseButton::Left => self.left_mouse.handle(state),
            MouseButton::Right => self.right_mouse.handle(state),
            _ => {}
        }
    }
}


/// Wheel up (away from the user) is positive.
fn scroll_steps_from_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                1
            } else if position.y < 0.0 {
                -1
            } else {
                0
            }
        }
    }
}
