    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use engine::world::{GridPos, OffgridTile, Tile, Tilemap, FALL_DEATH_AIR_TIME};
    use engine::{AssetStore, RecordingTarget};

    const PLAYER_SPAWN: GridPos = GridPos::new(2, 1);
    /// Far below the player so the enemy never has line of sight.
    const ENEMY_SPAWN: GridPos = GridPos::new(12, 10);

    fn paths_in(dir: &Path) -> AppPaths {
        let data_dir = dir.join("data");
        let maps_dir = data_dir.join("maps");
        fs::create_dir_all(&maps_dir).expect("maps dir");
        AppPaths {
            root: dir.to_path_buf(),
            images_dir: data_dir.join("images"),
            data_dir,
            maps_dir,
        }
    }

    fn level_map(with_enemy: bool, with_floor: bool) -> Tilemap {
        let mut map = Tilemap::default();
        if with_floor {
            for x in -2..8 {
                map.place(Tile::new(TileKind::Stone, 1, GridPos::new(x, 2)));
            }
        }
        map.place(Tile::new(
            TileKind::Spawners,
            SPAWNER_PLAYER_VARIANT,
            PLAYER_SPAWN,
        ));
        if with_enemy {
            map.place(Tile::new(
                TileKind::Spawners,
                SPAWNER_ENEMY_VARIANT,
                ENEMY_SPAWN,
            ));
        }
        map
    }

    fn world() -> SceneWorld {
        SceneWorld::new(Arc::new(AssetStore::empty()), (320, 240))
    }

    fn loaded_scene(paths: &AppPaths, world: &mut SceneWorld) -> GameScene {
        let mut scene = GameScene::with_rng(paths.clone(), 0, fastrand::Rng::with_seed(11));
        scene.load(world);
        scene
    }

    fn tick(scene: &mut GameScene, world: &mut SceneWorld, ticks: u32) {
        for _ in 0..ticks {
            let command = scene.update(1.0 / 60.0, &InputSnapshot::empty(), world);
            assert_eq!(command, SceneCommand::None);
        }
    }

    #[test]
    fn load_places_player_and_spawns_enemies_from_spawners() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(true, true).save(&paths.map_path(0)).expect("save");
        let mut world = world();

        let scene = loaded_scene(&paths, &mut world);

        assert_eq!(scene.player.body.position, PLAYER_SPAWN.to_pixel(16));
        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].body.position, ENEMY_SPAWN.to_pixel(16));
        assert_eq!(scene.transition, TRANSITION_START);
        assert!(world
            .tilemap()
            .tiles()
            .all(|tile| tile.kind != TileKind::Spawners));
        assert_eq!(world.tilemap().on_grid_len(), 10);
    }

    #[test]
    fn trees_stay_on_map_and_become_leaf_spawners() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut map = level_map(true, true);
        let tree = OffgridTile::new(TileKind::LargeDecor, TREE_VARIANT, Vec2::new(40.0, -10.0));
        map.push_offgrid(tree);
        map.push_offgrid(OffgridTile::new(TileKind::LargeDecor, 0, Vec2::ZERO));
        map.place(Tile::new(
            TileKind::LargeDecor,
            TREE_VARIANT,
            GridPos::new(5, 0),
        ));
        map.save(&paths.map_path(0)).expect("save");
        let mut world = world();

        let scene = loaded_scene(&paths, &mut world);

        assert_eq!(scene.leaf_spawners.len(), 2);
        assert_eq!(
            scene.leaf_spawners[0].area(),
            LeafSpawner::under_tree(tree.pos).area()
        );
        assert_eq!(
            scene.leaf_spawners[1].area(),
            LeafSpawner::under_tree(Vec2::new(80.0, 0.0)).area()
        );
        assert_eq!(world.tilemap().offgrid_len(), 2);
        assert!(world.tilemap().tile_at(GridPos::new(5, 0)).is_some());
    }

    #[test]
    fn leaf_requests_are_counted_as_cosmetic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut map = level_map(true, true);
        map.push_offgrid(OffgridTile::new(
            TileKind::LargeDecor,
            TREE_VARIANT,
            Vec2::new(40.0, -10.0),
        ));
        map.save(&paths.map_path(0)).expect("save");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        tick(&mut scene, &mut world, 2000);

        // Ambience plus roughly one leaf per 95 ticks.
        assert!(scene.cosmetic_requests > 5, "{}", scene.cosmetic_requests);
    }

    #[test]
    fn load_starts_ambience_loop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut world = world();

        let scene = loaded_scene(&paths, &mut world);

        assert_eq!(
            scene.effects.iter().collect::<Vec<_>>(),
            vec![&Effect::Sound(SoundCue::Ambience)]
        );
    }

    #[test]
    fn missing_map_starts_with_empty_level() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut world = world();

        let scene = loaded_scene(&paths, &mut world);

        assert!(world.tilemap().is_empty());
        assert!(scene.enemies.is_empty());
        assert_eq!(scene.player.body.position, PLAYER_START);
        assert_eq!(scene.level(), 0);
    }

    #[test]
    fn malformed_map_keeps_previous_tilemap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        fs::write(paths.map_path(0), "{ not json").expect("write");
        let mut world = world();
        world
            .tilemap_mut()
            .place(Tile::new(TileKind::Grass, 3, GridPos::new(4, 4)));

        let _scene = loaded_scene(&paths, &mut world);

        assert_eq!(
            world
                .tilemap()
                .tile_at(GridPos::new(4, 4))
                .map(|tile| tile.variant),
            Some(3)
        );
    }

    #[test]
    fn opening_transition_counts_up_to_zero_while_enemies_remain() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(true, true).save(&paths.map_path(0)).expect("save");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        tick(&mut scene, &mut world, 29);
        assert_eq!(scene.transition, -1);
        tick(&mut scene, &mut world, 5);
        assert_eq!(scene.transition, 0);
    }

    #[test]
    fn cleared_level_advances_to_next_map_and_caps_at_last() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(false, true).save(&paths.map_path(0)).expect("save 0");
        level_map(false, true).save(&paths.map_path(1)).expect("save 1");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        // -30 -> 0 in 15 ticks (both increments apply), then 31 more to pass 30.
        tick(&mut scene, &mut world, 45);
        assert_eq!(scene.level(), 0);
        tick(&mut scene, &mut world, 1);
        assert_eq!(scene.level(), 1);
        assert_eq!(scene.transition, TRANSITION_START + 1);

        tick(&mut scene, &mut world, 46);
        assert_eq!(scene.level(), 1);
    }

    #[test]
    fn projectile_hit_kills_player_and_level_reloads_after_a_second() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(true, true).save(&paths.map_path(0)).expect("save");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        let center = scene.player.rect().center();
        scene.projectiles.push(Projectile::new(center, 0.0));
        tick(&mut scene, &mut world, 1);

        assert_eq!(scene.dead, 1);
        assert_eq!(scene.screenshake, PROJECTILE_HIT_SHAKE);
        assert!(scene.projectiles.is_empty());

        scene.player.body.position = Vec2::new(-500.0, -500.0);
        tick(&mut scene, &mut world, 58);
        assert_eq!(scene.dead, 59);
        assert_eq!(scene.transition, TRANSITION_END);

        tick(&mut scene, &mut world, 1);
        assert_eq!(scene.dead, 0);
        let spawn = PLAYER_SPAWN.to_pixel(16);
        assert_eq!(scene.player.body.position.x, spawn.x);
        assert!((scene.player.body.position.y - spawn.y).abs() < 1.0);
        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.transition, TRANSITION_START);
    }

    #[test]
    fn dashing_player_ignores_projectiles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(true, true).save(&paths.map_path(0)).expect("save");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        scene.player.dashing = 60;
        let center = scene.player.rect().center();
        scene.projectiles.push(Projectile::new(center, 0.0));
        tick(&mut scene, &mut world, 1);

        assert_eq!(scene.dead, 0);
        assert_eq!(scene.projectiles.len(), 1);
    }

    #[test]
    fn falling_too_long_kills_the_player() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        level_map(true, false).save(&paths.map_path(0)).expect("save");
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        tick(&mut scene, &mut world, FALL_DEATH_AIR_TIME);
        assert_eq!(scene.dead, 0);
        tick(&mut scene, &mut world, 1);
        assert_eq!(scene.dead, 1);
    }

    #[test]
    fn jump_and_dash_edges_request_sounds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);
        scene.enemies.push(Enemy::new(Vec2::new(0.0, 500.0), &Default::default()));

        let input = InputSnapshot::empty()
            .with_jump_pressed(true)
            .with_dash_pressed(true);
        let _ = scene.update(1.0 / 60.0, &input, &mut world);

        assert_eq!(scene.player.jumps, 0);
        assert_eq!(scene.player.dashing, 60);
        // Ambience from the load, then jump and dash.
        assert_eq!(scene.cosmetic_requests, 3);
    }

    #[test]
    fn switch_scene_hands_over_to_editor_without_ticking() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);

        let input = InputSnapshot::empty().with_switch_scene_pressed(true);
        let command = scene.update(1.0 / 60.0, &input, &mut world);

        assert_eq!(command, SceneCommand::SwitchTo(SceneKey::Editor));
        assert_eq!(scene.transition, TRANSITION_START);
    }

    #[test]
    fn drained_effects_raise_shake_and_spawn_projectiles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut scene = GameScene::new(paths_in(dir.path()), 0);
        scene.screenshake = 20;
        scene.effects.emit(Effect::ScreenShake(16));
        scene
            .effects
            .emit(Effect::SpawnProjectile(Projectile::new(Vec2::ZERO, 1.5)));

        scene.drain_effects();

        assert_eq!(scene.screenshake, 20);
        assert_eq!(scene.projectiles.len(), 1);
        assert!(scene.effects.is_empty());
    }

    #[test]
    fn render_hides_player_during_fast_dash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = paths_in(dir.path());
        let mut world = world();
        let mut scene = loaded_scene(&paths, &mut world);
        scene.transition = 0;

        let count_player_boxes = |target: &RecordingTarget| {
            target
                .rects
                .iter()
                .filter(|(_, color)| *color == PLAYER_FALLBACK_COLOR)
                .count()
        };

        let mut target = RecordingTarget::new((320, 240));
        scene.render(&world, &mut target);
        assert_eq!(count_player_boxes(&target), 1);

        scene.player.dashing = 55;
        let mut target = RecordingTarget::new((320, 240));
        scene.render(&world, &mut target);
        assert_eq!(count_player_boxes(&target), 0);
    }

    #[test]
    fn transition_spans_cover_view_at_zero_radius() {
        let spans = transition_spans((320, 240), 0);
        assert_eq!(spans, vec![(ScreenRect::new(0, 0, 320, 240), TRANSITION_COLOR)]);
    }

    #[test]
    fn transition_spans_leave_centre_open() {
        let spans = transition_spans((320, 240), 80);

        let middle_row = spans
            .iter()
            .filter(|(rect, _)| rect.y == 120)
            .map(|(rect, _)| *rect)
            .collect::<Vec<_>>();
        assert_eq!(
            middle_row,
            vec![
                ScreenRect::new(0, 120, 80, 1),
                ScreenRect::new(240, 120, 80, 1)
            ]
        );
        assert!(spans
            .iter()
            .any(|(rect, _)| *rect == ScreenRect::new(0, 0, 320, 1)));
    }

    #[test]
    fn transition_spans_vanish_when_circle_covers_view() {
        assert!(transition_spans((320, 240), 240).is_empty());
    }
