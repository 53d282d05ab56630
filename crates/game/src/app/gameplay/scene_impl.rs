impl Scene for GameScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.player = Player::new(PLAYER_START, world.assets().animations());
        self.cosmetic_requests = 0;
        let level = self.level.min(self.last_level());
        self.load_level(level, world);
        self.effects.emit(Effect::Sound(SoundCue::Ambience));
        info!(
            scene = SceneKey::Game.name(),
            level = self.level,
            enemies = self.enemies.len(),
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.switch_scene_pressed() {
            return SceneCommand::SwitchTo(SceneKey::Editor);
        }

        self.tick(input, world);
        SceneCommand::None
    }

    fn render(&mut self, world: &SceneWorld, target: &mut dyn RenderTarget) {
        let (width, height) = target.view_size();
        target.fill_rect(ScreenRect::new(0, 0, width, height), SKY_COLOR);

        let shake = self.shake_offset();
        let (scroll_x, scroll_y) = world.camera().render_offset();
        let offset = (scroll_x - shake.0, scroll_y - shake.1);

        world.tilemap().render(target, offset);

        let gun = world.assets().named("gun");
        for enemy in &self.enemies {
            draw_body(target, &enemy.body, offset, ENEMY_FALLBACK_COLOR);
            if let Some(gun) = gun {
                draw_gun(target, &enemy.body, gun, offset);
            }
        }

        if self.dead == 0 && self.player.is_visible() {
            draw_body(target, &self.player.body, offset, PLAYER_FALLBACK_COLOR);
        }

        let projectile_sprite = world.assets().named("projectile");
        for projectile in &self.projectiles {
            draw_projectile(target, projectile, projectile_sprite, offset);
        }

        if self.transition != 0 {
            let radius = (TRANSITION_END - self.transition.abs()) * TRANSITION_RADIUS_STEP;
            for (rect, color) in transition_spans((width, height), radius) {
                target.fill_rect(rect, color);
            }
        }
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        self.enemies.clear();
        self.leaf_spawners.clear();
        self.projectiles.clear();
        let _ = self.effects.drain().count();
        info!(
            scene = SceneKey::Game.name(),
            cosmetic_requests = self.cosmetic_requests,
            "scene_unloaded"
        );
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        Some(format!(
            "Ninja Game | level {} | enemies {}",
            self.level(),
            self.enemies.len()
        ))
    }
}
