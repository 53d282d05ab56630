impl Scene for EditorScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.tile_group = 0;
        self.tile_variant = 0;
        self.on_grid = true;
        self.cursor = None;

        let path = self.paths.map_path(self.level);
        match world.tilemap_mut().load(&path) {
            Ok(()) => info!(
                level = self.level,
                on_grid = world.tilemap().on_grid_len(),
                offgrid = world.tilemap().offgrid_len(),
                "level_loaded"
            ),
            Err(error) if error.is_not_found() => {
                info!(level = self.level, path = %path.display(), "editor_new_map");
            }
            Err(error) => warn!(level = self.level, error = %error, "level_load_failed"),
        }
        info!(scene = SceneKey::Editor.name(), level = self.level, "scene_loaded");
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.switch_scene_pressed() {
            return SceneCommand::HardResetTo(SceneKey::Game);
        }

        world.camera_mut().pan(Vec2::new(
            input.horizontal_axis() * PAN_SPEED,
            input.vertical_axis() * PAN_SPEED,
        ));

        self.cursor = input.cursor_position_px().map(|window_px| {
            window_to_world(
                window_px,
                input.window_size(),
                world.display_size(),
                (0, 0),
            )
        });

        let (kind, _) = self.current_tile();
        let variant_count = world.assets().variant_count(kind);
        self.cycle_palette(
            input.scroll_steps(),
            input.is_down(InputAction::Modifier),
            variant_count,
        );

        self.paint(input, world);

        if input.toggle_grid_pressed() {
            self.on_grid = !self.on_grid;
            info!(on_grid = self.on_grid, "editor_grid_toggled");
        }
        if input.autotile_pressed() {
            let changed = world.tilemap_mut().autotile();
            info!(changed, "editor_autotiled");
        }
        if input.save_pressed() {
            self.save(world);
        }

        SceneCommand::None
    }

    fn render(&mut self, world: &SceneWorld, target: &mut dyn RenderTarget) {
        let (width, height) = target.view_size();
        target.fill_rect(ScreenRect::new(0, 0, width, height), BACKGROUND_COLOR);

        let offset = world.camera().render_offset();
        world.tilemap().render(target, offset);

        let (kind, variant) = self.current_tile();
        target.draw_tile(kind, variant, PALETTE_PREVIEW_POS, PREVIEW_ALPHA);

        let preview = if self.on_grid {
            self.cursor_cell(world).map(|cell| {
                let size = world.tilemap().tile_size() as i32;
                ScreenPoint::new(cell.x * size - offset.0, cell.y * size - offset.1)
            })
        } else {
            self.cursor
                .map(|display| ScreenPoint::new(display.x as i32, display.y as i32))
        };
        if let Some(dest) = preview {
            target.draw_tile(kind, variant, dest, PREVIEW_ALPHA);
        }
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        self.cursor = None;
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let (kind, variant) = self.current_tile();
        Some(format!(
            "Editor | level {} | {} {} | {}",
            self.level,
            kind.name(),
            variant,
            if self.on_grid { "on-grid" } else { "off-grid" }
        ))
    }
}
