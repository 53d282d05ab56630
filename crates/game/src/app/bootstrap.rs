use std::env;

use engine::{resolve_app_paths, AppError, LoopConfig, Scene, SceneKey};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::editor::EditorScene;
use super::gameplay::GameScene;

const START_SCENE_ENV_VAR: &str = "NINJA_START_SCENE";
const LEVEL_ENV_VAR: &str = "NINJA_LEVEL";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: Box<dyn Scene>,
    pub(crate) editor: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Ninja Game Startup ===");

    let paths = resolve_app_paths()?;
    let start_scene = parse_start_scene(env::var(START_SCENE_ENV_VAR).ok().as_deref());
    let level = parse_level(env::var(LEVEL_ENV_VAR).ok().as_deref());
    info!(
        root = %paths.root.display(),
        scene = start_scene.name(),
        level,
        levels = paths.level_count(),
        "app_paths_resolved"
    );

    let config = LoopConfig {
        start_scene,
        images_dir: paths.images_dir.clone(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        game: Box::new(GameScene::new(paths.clone(), level)),
        editor: Box::new(EditorScene::new(paths, level)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_start_scene(raw: Option<&str>) -> SceneKey {
    match raw.map(str::trim) {
        None | Some("") => SceneKey::Game,
        Some(value) if value.eq_ignore_ascii_case("game") => SceneKey::Game,
        Some(value) if value.eq_ignore_ascii_case("editor") => SceneKey::Editor,
        Some(value) => {
            warn!(var = START_SCENE_ENV_VAR, value, "unknown_start_scene");
            SceneKey::Game
        }
    }
}

fn parse_level(raw: Option<&str>) -> usize {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return 0;
    };
    value.parse().unwrap_or_else(|_| {
        warn!(var = LEVEL_ENV_VAR, value, "invalid_level");
        0
    })
}
