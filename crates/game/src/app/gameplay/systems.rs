impl GameScene {
    /// Replaces the tilemap with map `level`, resets the per-level state and
    /// turns spawner tiles into the player position and enemies.
    fn load_level(&mut self, level: usize, world: &mut SceneWorld) {
        let path = self.paths.map_path(level);
        match world.tilemap_mut().load(&path) {
            Ok(()) => info!(
                level,
                on_grid = world.tilemap().on_grid_len(),
                offgrid = world.tilemap().offgrid_len(),
                "level_loaded"
            ),
            Err(error) if error.is_not_found() => {
                warn!(level, path = %path.display(), "no map found");
            }
            Err(error) => warn!(level, error = %error, "level_load_failed"),
        }

        self.level = level;
        *world.camera_mut() = Default::default();
        self.dead = 0;
        self.screenshake = 0;
        self.transition = TRANSITION_START;
        self.enemies.clear();
        self.projectiles.clear();
        let _ = self.effects.drain().count();

        let (tilemap, _, assets) = world.split_mut();
        let trees = tilemap.extract(&[(TileKind::LargeDecor, TREE_VARIANT)], true);
        self.leaf_spawners = LeafSpawner::from_trees(&trees);

        let spawners = tilemap.extract(
            &[
                (TileKind::Spawners, SPAWNER_PLAYER_VARIANT),
                (TileKind::Spawners, SPAWNER_ENEMY_VARIANT),
            ],
            false,
        );
        for spawner in spawners {
            if spawner.variant == SPAWNER_PLAYER_VARIANT {
                self.player.body.position = spawner.pos;
            } else {
                self.enemies.push(Enemy::new(spawner.pos, assets.animations()));
            }
        }
        debug!(
            level,
            enemies = self.enemies.len(),
            trees = self.leaf_spawners.len(),
            "spawners_extracted"
        );
    }

    /// Opening fade, level-clear fade and the move to the next map.
    fn advance_transition(&mut self, world: &mut SceneWorld) {
        if self.enemies.is_empty() {
            self.transition += 1;
            if self.transition > TRANSITION_END {
                let next = (self.level + 1).min(self.last_level());
                info!(from = self.level, to = next, "level_cleared");
                self.load_level(next, world);
            }
        }
        if self.transition < 0 {
            self.transition += 1;
        }
    }

    fn advance_death(&mut self, world: &mut SceneWorld) {
        if self.dead == 0 {
            return;
        }
        self.dead += 1;
        if self.dead >= DEATH_FADE_TICK {
            self.transition = (self.transition + 1).min(TRANSITION_END);
        }
        if self.dead >= DEATH_RELOAD_TICK {
            self.player.air_time = 0;
            self.load_level(self.level, world);
        }
    }

    fn mark_dead(&mut self, cause: &'static str) {
        if self.dead == 0 {
            info!(level = self.level, cause, "player_died");
        }
        self.dead += 1;
    }

    fn update_enemies(&mut self, world: &SceneWorld) {
        let ctx = BodyContext::new(world.tilemap(), world.assets().animations());
        let view = PlayerView {
            position: self.player.body.position,
            rect: self.player.rect(),
            dash_kills: self.player.dash_kills(),
        };
        let (rng, effects) = (&mut self.rng, &mut self.effects);
        self.enemies.retain_mut(|enemy| {
            match enemy.update(ctx, &view, rng, effects) {
                EnemyOutcome::Alive => true,
                EnemyOutcome::Killed => {
                    info!(x = enemy.body.position.x, y = enemy.body.position.y, "enemy_killed");
                    false
                }
            }
        });
    }

    fn update_player(&mut self, input: &InputSnapshot, world: &SceneWorld) {
        if self.dead == 0 {
            let ctx = BodyContext::new(world.tilemap(), world.assets().animations());
            let movement = Vec2::new(input.horizontal_axis(), 0.0);
            if self.player.update(ctx, movement, &mut self.effects) == PlayerOutcome::FellOut {
                self.mark_dead("fell");
            }
        }

        if input.jump_pressed() && self.player.jump() {
            self.effects.emit(Effect::Sound(SoundCue::Jump));
        }
        if input.dash_pressed() && self.player.dash() {
            self.effects.emit(Effect::Sound(SoundCue::Dash));
        }
    }

    fn update_projectiles(&mut self, world: &SceneWorld) {
        let target = (self.dead == 0).then(|| ProjectileTarget {
            rect: self.player.rect(),
            dashing: self.player.dashing,
        });
        let mut player_hit = false;
        let effects = &mut self.effects;
        self.projectiles.retain_mut(|projectile| {
            match projectile.advance(world.tilemap(), target) {
                ProjectileOutcome::Flying => true,
                ProjectileOutcome::Expired => false,
                ProjectileOutcome::HitWall => {
                    let base_angle = if projectile.direction > 0.0 { PI } else { 0.0 };
                    effects.emit(Effect::Sparks {
                        origin: projectile.pos,
                        base_angle,
                        count: WALL_HIT_SPARKS,
                        jitter: WALL_HIT_JITTER,
                    });
                    false
                }
                ProjectileOutcome::HitPlayer => {
                    player_hit = true;
                    false
                }
            }
        });

        if player_hit {
            let center = self.player.rect().center();
            self.mark_dead("shot");
            self.effects.emit(Effect::ScreenShake(PROJECTILE_HIT_SHAKE));
            self.effects.emit(Effect::Sound(SoundCue::Hit));
            self.effects.emit(Effect::Sparks {
                origin: center,
                base_angle: 0.0,
                count: PROJECTILE_HIT_SPARKS,
                jitter: PI,
            });
            self.effects.emit(Effect::Burst {
                origin: center,
                count: PROJECTILE_HIT_BURST,
            });
        }
    }

    /// Applies gameplay-relevant requests and hands cosmetic ones to the log.
    fn drain_effects(&mut self) {
        let effects = self.effects.drain().collect::<Vec<_>>();
        for effect in effects {
            match effect {
                Effect::ScreenShake(amount) => {
                    self.screenshake = self.screenshake.max(amount);
                }
                Effect::SpawnProjectile(projectile) => self.projectiles.push(projectile),
                Effect::Sound(cue) => {
                    self.cosmetic_requests += 1;
                    debug!(sound = cue.name(), "sound_requested");
                }
                Effect::Sparks { origin, count, .. } => {
                    self.cosmetic_requests += 1;
                    debug!(x = origin.x, y = origin.y, count, "sparks_requested");
                }
                Effect::Burst { origin, count } => {
                    self.cosmetic_requests += 1;
                    debug!(x = origin.x, y = origin.y, count, "burst_requested");
                }
                Effect::DashTrail { .. } | Effect::Leaf { .. } => {
                    self.cosmetic_requests += 1;
                }
            }
        }
    }

    /// One fixed tick of the play session.
    fn tick(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        self.advance_transition(world);
        self.advance_death(world);
        self.screenshake = self.screenshake.saturating_sub(1);
        for spawner in &self.leaf_spawners {
            spawner.tick(&mut self.rng, &mut self.effects);
        }

        let focus = self.player.rect().center();
        let display_size = world.display_size();
        world.camera_mut().follow(focus, display_size);

        self.update_enemies(world);
        self.update_player(input, world);
        self.update_projectiles(world);
        self.drain_effects();
    }
}
