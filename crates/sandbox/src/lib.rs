use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod actor;
pub mod assertions;
pub mod behavior;
pub mod collections;
pub mod content;
pub mod fields;
pub mod math;
pub mod physics;
pub mod profiling;

pub use actor::{Actor, ActorId, ActorWorld, Transform};
pub use behavior::{Behavior, BehaviorContext, BehaviorError, BehaviorHost, HostError, TickReport};
pub use content::{compile_actor_defs, ActorDef, ActorDefDatabase, ContentError, ContentErrorCode};
pub use fields::{PresetField, TransformField};
pub use physics::{
    get_physics_preset, set_physics_preset, set_physics_preset_by_name, InvalidPresetError,
    PhysicsAttributes, PhysicsBody, PhysicsPreset, PhysicsPresetExt,
};

pub const ROOT_ENV_VAR: &str = "SANDBOX_ROOT";

#[derive(Debug, Clone)]
pub struct SandboxPaths {
    pub root: PathBuf,
    pub actors_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl SandboxPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let actors_dir = root.join("assets").join("actors");
        let cache_dir = root.join("cache");
        Self {
            root,
            actors_dir,
            cache_dir,
        }
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
    #[error("failed to create cache directory at {path}: {source}")]
    CreateCacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "{env_var} is set but does not point to a valid sandbox root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
    #[error(
        "Could not detect sandbox root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/sandbox\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_sandbox_paths() -> Result<SandboxPaths, StartupError> {
    let paths = SandboxPaths::from_root(resolve_root()?);
    fs::create_dir_all(&paths.cache_dir).map_err(|source| StartupError::CreateCacheDir {
        path: paths.cache_dir.clone(),
        source,
    })?;
    Ok(paths)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if is_root_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    path: normalized,
                    env_var: ROOT_ENV_VAR,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_root_marker(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
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

fn is_root_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
