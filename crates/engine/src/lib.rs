use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod assets;
pub mod world;

pub use app::{
    run_app, window_to_world, world_to_screen, AppError, Camera, FrameTarget, InputAction,
    InputSnapshot, LoopConfig, LoopStats, MissingAsset, RecordingTarget, RenderTarget, Renderer,
    Scene, SceneCommand, SceneKey, SceneWorld, ScreenPoint, ScreenRect, CAMERA_LAG,
    SLOW_FRAME_ENV_VAR,
};
pub use assets::{AssetError, AssetStore, LoadedSprite, SpriteId};

pub const ROOT_ENV_VAR: &str = "NINJA_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub maps_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl AppPaths {
    /// `data/maps/<level>.json`
    pub fn map_path(&self, level: usize) -> PathBuf {
        self.maps_dir.join(format!("{level}.json"))
    }

    /// Number of consecutively numbered maps starting at `0.json`.
    pub fn level_count(&self) -> usize {
        (0..).take_while(|level| self.map_path(*level).is_file()).count()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create maps directory at {path}: {source}")]
    CreateMapsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "NINJA_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or data/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or data/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/ninja-game\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    app_paths_under(root)
}

fn app_paths_under(root: PathBuf) -> Result<AppPaths, StartupError> {
    let data_dir = root.join("data");
    let maps_dir = data_dir.join("maps");
    let images_dir = data_dir.join("images");

    fs::create_dir_all(&maps_dir).map_err(|source| StartupError::CreateMapsDir {
        path: maps_dir.clone(),
        source,
    })?;

    Ok(AppPaths {
        root,
        data_dir,
        maps_dir,
        images_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_data = path.join("data").is_dir();

    cargo_toml && (has_crates || has_data)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
