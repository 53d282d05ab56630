use std::sync::Arc;

use super::input::{ActionStates, InputAction, InputEdges};
use super::rendering::RenderTarget;
use crate::assets::AssetStore;
use crate::world::{Tilemap, Vec2};

/// Camera follow smoothing: each tick closes 1/CAMERA_LAG of the gap.
pub const CAMERA_LAG: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Game,
    Editor,
}

impl SceneKey {
    pub const fn name(self) -> &'static str {
        match self {
            SceneKey::Game => "game",
            SceneKey::Editor => "editor",
        }
    }

    pub const fn other(self) -> SceneKey {
        match self {
            SceneKey::Game => SceneKey::Editor,
            SceneKey::Editor => SceneKey::Game,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
    HardResetTo(SceneKey),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    edges: InputEdges,
    cursor_position_px: Option<Vec2>,
    left_mouse_down: bool,
    right_mouse_down: bool,
    scroll_steps: i32,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        edges: InputEdges,
        cursor_position_px: Option<Vec2>,
        left_mouse_down: bool,
        right_mouse_down: bool,
        scroll_steps: i32,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            edges,
            cursor_position_px,
            left_mouse_down,
            right_mouse_down,
            scroll_steps,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// `right - left` as a movement component in `-1.0..=1.0`.
    pub fn horizontal_axis(&self) -> f32 {
        let right = self.is_down(InputAction::MoveRight) as i32;
        let left = self.is_down(InputAction::MoveLeft) as i32;
        (right - left) as f32
    }

    pub fn vertical_axis(&self) -> f32 {
        let down = self.is_down(InputAction::MoveDown) as i32;
        let up = self.is_down(InputAction::MoveUp) as i32;
        (down - up) as f32
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_switch_scene_pressed(mut self, pressed: bool) -> Self {
        self.edges.switch_scene = pressed;
        self
    }

    pub fn with_save_pressed(mut self, pressed: bool) -> Self {
        self.edges.save = pressed;
        self
    }

    pub fn with_jump_pressed(mut self, pressed: bool) -> Self {
        self.edges.jump = pressed;
        self
    }

    pub fn with_dash_pressed(mut self, pressed: bool) -> Self {
        self.edges.dash = pressed;
        self
    }

    pub fn with_toggle_grid_pressed(mut self, pressed: bool) -> Self {
        self.edges.toggle_grid = pressed;
        self
    }

    pub fn with_autotile_pressed(mut self, pressed: bool) -> Self {
        self.edges.autotile = pressed;
        self
    }

    pub fn with_left_click_pressed(mut self, pressed: bool) -> Self {
        self.edges.left_click = pressed;
        self
    }

    pub fn with_right_click_pressed(mut self, pressed: bool) -> Self {
        self.edges.right_click = pressed;
        self
    }

    pub fn with_left_mouse_down(mut self, is_down: bool) -> Self {
        self.left_mouse_down = is_down;
        self
    }

    pub fn with_right_mouse_down(mut self, is_down: bool) -> Self {
        self.right_mouse_down = is_down;
        self
    }

    pub fn with_scroll_steps(mut self, scroll_steps: i32) -> Self {
        self.scroll_steps = scroll_steps;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn switch_scene_pressed(&self) -> bool {
        self.edges.switch_scene
    }

    pub fn save_pressed(&self) -> bool {
        self.edges.save
    }

    pub fn jump_pressed(&self) -> bool {
        self.edges.jump
    }

    pub fn dash_pressed(&self) -> bool {
        self.edges.dash
    }

    pub fn toggle_grid_pressed(&self) -> bool {
        self.edges.toggle_grid
    }

    pub fn autotile_pressed(&self) -> bool {
        self.edges.autotile
    }

    pub fn left_click_pressed(&self) -> bool {
        self.edges.left_click
    }

    pub fn right_click_pressed(&self) -> bool {
        self.edges.right_click
    }

    pub fn left_mouse_down(&self) -> bool {
        self.left_mouse_down
    }

    pub fn right_mouse_down(&self) -> bool {
        self.right_mouse_down
    }

    /// Positive when the wheel moved up/away from the user.
    pub fn scroll_steps(&self) -> i32 {
        self.scroll_steps
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Scroll position of the display's top-left corner in world pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub scroll: Vec2,
}

impl Camera {
    /// Eases toward centring `focus` on a display of `display_size`.
    ///
    /// Each axis centres on its own half extent, so y targets half the
    /// display height. Framing y on half the width instead would settle the
    /// focus `(width - height) / 2` pixels below the middle of the screen.
    pub fn follow(&mut self, focus: Vec2, display_size: (u32, u32)) {
        let half_w = display_size.0 as f32 / 2.0;
        let half_h = display_size.1 as f32 / 2.0;
        self.scroll.x += (focus.x - half_w - self.scroll.x) / CAMERA_LAG;
        self.scroll.y += (focus.y - half_h - self.scroll.y) / CAMERA_LAG;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.scroll.x += delta.x;
        self.scroll.y += delta.y;
    }

    /// Integer offset used for drawing. Truncates toward zero.
    pub fn render_offset(&self) -> (i32, i32) {
        (self.scroll.x as i32, self.scroll.y as i32)
    }
}

#[derive(Debug)]
pub struct SceneWorld {
    tilemap: Tilemap,
    camera: Camera,
    assets: Arc<AssetStore>,
    display_size: (u32, u32),
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self {
            tilemap: Tilemap::default(),
            camera: Camera::default(),
            assets: Arc::new(AssetStore::empty()),
            display_size: (1, 1),
        }
    }
}

impl SceneWorld {
    pub fn new(assets: Arc<AssetStore>, display_size: (u32, u32)) -> Self {
        Self {
            assets,
            display_size,
            ..Self::default()
        }
    }

    /// Drops per-level state. Shared resources survive.
    pub fn clear(&mut self) {
        self.tilemap = Tilemap::default();
        self.camera = Camera::default();
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn tilemap_mut(&mut self) -> &mut Tilemap {
        &mut self.tilemap
    }

    pub fn set_tilemap(&mut self, tilemap: Tilemap) {
        self.tilemap = tilemap;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn set_assets(&mut self, assets: Arc<AssetStore>) {
        self.assets = assets;
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }

    pub fn set_display_size(&mut self, display_size: (u32, u32)) {
        self.display_size = (display_size.0.max(1), display_size.1.max(1));
    }

    /// Borrows the tilemap mutably alongside the read-only asset store.
    pub fn split_mut(&mut self) -> (&mut Tilemap, &mut Camera, &AssetStore) {
        (&mut self.tilemap, &mut self.camera, &self.assets)
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld, target: &mut dyn RenderTarget);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

pub(crate) struct SceneMachine {
    game: SceneRuntime,
    editor: SceneRuntime,
    active_scene: SceneKey,
}

impl SceneMachine {
    pub(crate) fn new(game: Box<dyn Scene>, editor: Box<dyn Scene>, active_scene: SceneKey) -> Self {
        Self {
            game: SceneRuntime {
                scene: game,
                world: SceneWorld::default(),
                is_loaded: false,
            },
            editor: SceneRuntime {
                scene: editor,
                world: SceneWorld::default(),
                is_loaded: false,
            },
            active_scene,
        }
    }

    pub(crate) fn active_scene(&self) -> SceneKey {
        self.active_scene
    }

    pub(crate) fn set_assets_for_all(&mut self, assets: Arc<AssetStore>) {
        self.game.world.set_assets(Arc::clone(&assets));
        self.editor.world.set_assets(assets);
    }

    pub(crate) fn set_display_size_for_all(&mut self, display_size: (u32, u32)) {
        self.game.world.set_display_size(display_size);
        self.editor.world.set_display_size(display_size);
    }

    pub(crate) fn load_active(&mut self) {
        self.load_scene_if_needed(self.active_scene);
    }

    pub(crate) fn update_active(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
    ) -> SceneCommand {
        let runtime = self.active_runtime_mut();
        let (scene, world) = (&mut runtime.scene, &mut runtime.world);
        scene.update(fixed_dt_seconds, input, world)
    }

    pub(crate) fn render_active(&mut self, target: &mut dyn RenderTarget) {
        let runtime = self.active_runtime_mut();
        runtime.scene.render(&runtime.world, target);
    }

    #[cfg(test)]
    pub(crate) fn active_world(&self) -> &SceneWorld {
        &self.active_runtime_ref().world
    }

    #[cfg(test)]
    pub(crate) fn active_world_mut(&mut self) -> &mut SceneWorld {
        &mut self.active_runtime_mut().world
    }

    pub(crate) fn debug_title_active(&self) -> Option<String> {
        let runtime = self.active_runtime_ref();
        runtime.scene.debug_title(&runtime.world)
    }

    pub(crate) fn switch_to(&mut self, next_scene: SceneKey) -> bool {
        if self.active_scene == next_scene {
            return false;
        }

        self.load_scene_if_needed(next_scene);
        self.active_scene = next_scene;
        true
    }

    pub(crate) fn hard_reset_to(&mut self, next_scene: SceneKey) -> bool {
        let runtime = self.runtime_mut(next_scene);
        if runtime.is_loaded {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.unload(world);
        }
        runtime.world.clear();
        {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.load(world);
        }
        runtime.is_loaded = true;
        let changed = self.active_scene != next_scene;
        self.active_scene = next_scene;
        changed
    }

    pub(crate) fn shutdown_all(&mut self) {
        for runtime in [&mut self.game, &mut self.editor] {
            if runtime.is_loaded {
                let (scene, world) = (&mut runtime.scene, &mut runtime.world);
                scene.unload(world);
                runtime.world.clear();
                runtime.is_loaded = false;
            }
        }
    }

    fn load_scene_if_needed(&mut self, key: SceneKey) {
        if self.runtime_ref(key).is_loaded {
            return;
        }
        let runtime = self.runtime_mut(key);
        {
            let (scene, world) = (&mut runtime.scene, &mut runtime.world);
            scene.load(world);
        }
        runtime.is_loaded = true;
    }

    fn active_runtime_mut(&mut self) -> &mut SceneRuntime {
        self.runtime_mut(self.active_scene)
    }

    fn active_runtime_ref(&self) -> &SceneRuntime {
        self.runtime_ref(self.active_scene)
    }

    fn runtime_mut(&mut self, key: SceneKey) -> &mut SceneRuntime {
        match key {
            SceneKey::Game => &mut self.game,
            SceneKey::Editor => &mut self.editor,
        }
    }

    fn runtime_ref(&self, key: SceneKey) -> &SceneRuntime {
        match key {
            SceneKey::Game => &self.game,
            SceneKey::Editor => &self.editor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RecordingTarget;
    use crate::world::{GridPos, Tile, TileKind};

    /// Places `tile_count` grass tiles on load and counts its lifecycle calls.
    struct TestScene {
        tile_count: i32,
        step_x: f32,
        loads: u32,
        unloads: u32,
    }

    impl TestScene {
        fn boxed(tile_count: i32, step_x: f32) -> Box<dyn Scene> {
            Box::new(Self {
                tile_count,
                step_x,
                loads: 0,
                unloads: 0,
            })
        }
    }

    impl Scene for TestScene {
        fn load(&mut self, world: &mut SceneWorld) {
            for x in 0..self.tile_count {
                world
                    .tilemap_mut()
                    .place(Tile::new(TileKind::Grass, 0, GridPos::new(x, 0)));
            }
            self.loads += 1;
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &InputSnapshot,
            world: &mut SceneWorld,
        ) -> SceneCommand {
            world.camera_mut().pan(Vec2::new(self.step_x, 0.0));
            SceneCommand::None
        }

        fn render(&mut self, world: &SceneWorld, target: &mut dyn RenderTarget) {
            world.tilemap().render(target, world.camera().render_offset());
        }

        fn unload(&mut self, _world: &mut SceneWorld) {
            self.unloads += 1;
        }

        fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
            Some(format!("loads={} unloads={}", self.loads, self.unloads))
        }
    }

    fn machine(start: SceneKey) -> SceneMachine {
        SceneMachine::new(TestScene::boxed(2, 1.0), TestScene::boxed(1, 3.0), start)
    }

    #[test]
    fn switch_away_and_back_preserves_each_scene_world() {
        let mut machine = machine(SceneKey::Game);
        machine.load_active();
        machine
            .active_world_mut()
            .tilemap_mut()
            .place(Tile::new(TileKind::Stone, 4, GridPos::new(9, 9)));

        assert!(machine.switch_to(SceneKey::Editor));
        assert_eq!(machine.active_world().tilemap().on_grid_len(), 1);
        assert!(machine.switch_to(SceneKey::Game));

        let tilemap = machine.active_world().tilemap();
        assert_eq!(tilemap.on_grid_len(), 3);
        assert_eq!(
            tilemap.tile_at(GridPos::new(9, 9)).map(|tile| tile.variant),
            Some(4)
        );
        assert_eq!(
            machine.debug_title_active().as_deref(),
            Some("loads=1 unloads=0")
        );
    }

    #[test]
    fn switching_to_active_scene_is_a_no_op() {
        let mut machine = machine(SceneKey::Editor);
        machine.load_active();
        assert!(!machine.switch_to(SceneKey::Editor));
        assert_eq!(machine.active_scene(), SceneKey::Editor);
    }

    #[test]
    fn inactive_scene_world_does_not_advance() {
        let mut machine = machine(SceneKey::Game);
        machine.load_active();
        let _ = machine.update_active(1.0 / 60.0, &InputSnapshot::empty());
        let before_switch = machine.active_world().camera().scroll.x;

        assert!(machine.switch_to(SceneKey::Editor));
        for _ in 0..10 {
            let _ = machine.update_active(1.0 / 60.0, &InputSnapshot::empty());
        }
        assert_eq!(machine.active_world().camera().scroll.x, 30.0);

        assert!(machine.switch_to(SceneKey::Game));
        assert_eq!(machine.active_world().camera().scroll.x, before_switch);
    }

    #[test]
    fn hard_reset_recreates_target_scene_state() {
        let mut machine = machine(SceneKey::Game);
        machine.load_active();
        machine.active_world_mut().camera_mut().scroll = Vec2::new(9.0, 3.0);
        machine
            .active_world_mut()
            .tilemap_mut()
            .remove(GridPos::new(0, 0));

        assert!(!machine.hard_reset_to(SceneKey::Game));

        assert_eq!(machine.active_world().tilemap().on_grid_len(), 2);
        assert_eq!(machine.active_world().camera().scroll, Vec2::ZERO);
        assert_eq!(
            machine.debug_title_active().as_deref(),
            Some("loads=2 unloads=1")
        );
    }

    #[test]
    fn hard_reset_to_unloaded_scene_loads_it_once() {
        let mut machine = machine(SceneKey::Editor);
        machine.load_active();

        assert!(machine.hard_reset_to(SceneKey::Game));
        assert_eq!(machine.active_scene(), SceneKey::Game);
        assert_eq!(
            machine.debug_title_active().as_deref(),
            Some("loads=1 unloads=0")
        );
    }

    #[test]
    fn clear_keeps_shared_resources() {
        let mut world = SceneWorld::new(Arc::new(AssetStore::empty()), (320, 240));
        world
            .tilemap_mut()
            .place(Tile::new(TileKind::Grass, 0, GridPos::new(0, 0)));
        world.camera_mut().scroll = Vec2::new(5.0, 5.0);

        world.clear();

        assert!(world.tilemap().is_empty());
        assert_eq!(world.camera().scroll, Vec2::ZERO);
        assert_eq!(world.display_size(), (320, 240));
    }

    #[test]
    fn set_display_size_for_all_reaches_both_worlds() {
        let mut machine = machine(SceneKey::Game);
        machine.set_display_size_for_all((320, 240));
        assert_eq!(machine.active_world().display_size(), (320, 240));
        assert!(machine.switch_to(SceneKey::Editor));
        assert_eq!(machine.active_world().display_size(), (320, 240));
    }

    #[test]
    fn render_active_draws_active_world_only() {
        let mut machine = machine(SceneKey::Game);
        machine.load_active();
        let mut target = RecordingTarget::new((320, 240));

        machine.render_active(&mut target);

        assert_eq!(target.tiles.len(), 2);
    }

    #[test]
    fn shutdown_unloads_loaded_scenes() {
        let mut machine = machine(SceneKey::Game);
        machine.load_active();
        machine.shutdown_all();
        assert!(machine.active_world().tilemap().is_empty());
    }

    #[test]
    fn camera_follow_closes_a_tenth_of_the_gap() {
        let mut camera = Camera::default();
        camera.follow(Vec2::new(260.0, 220.0), (320, 240));
        assert_eq!(camera.scroll, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn camera_settles_with_focus_at_display_centre() {
        let mut camera = Camera::default();
        let focus = Vec2::new(500.0, 300.0);
        for _ in 0..400 {
            camera.follow(focus, (320, 240));
        }
        assert!((focus.x - camera.scroll.x - 160.0).abs() < 0.01);
        assert!((focus.y - camera.scroll.y - 120.0).abs() < 0.01);
    }

    #[test]
    fn camera_render_offset_truncates_toward_zero() {
        let camera = Camera {
            scroll: Vec2::new(3.9, -2.7),
        };
        assert_eq!(camera.render_offset(), (3, -2));
    }

    #[test]
    fn horizontal_axis_is_right_minus_left() {
        let both = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true);
        assert_eq!(both.horizontal_axis(), 0.0);

        let left = InputSnapshot::empty().with_action_down(InputAction::MoveLeft, true);
        assert_eq!(left.horizontal_axis(), -1.0);
        assert_eq!(left.vertical_axis(), 0.0);
    }
}
