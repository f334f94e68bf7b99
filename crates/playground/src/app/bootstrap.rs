use sandbox::{compile_actor_defs, resolve_sandbox_paths, SandboxPaths};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, PlaygroundConfig, CONFIG_FILE_NAME, TICKS_ENV_VAR};
use super::spawning::{spawn_requests_from_defs, SpawnRequest};

pub(crate) struct AppWiring {
    pub(crate) paths: SandboxPaths,
    pub(crate) config: PlaygroundConfig,
    pub(crate) spawns: Vec<SpawnRequest>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Sandbox Playground Startup ===");

    let paths = resolve_sandbox_paths().map_err(|error| error.to_string())?;
    let ticks_override = std::env::var(TICKS_ENV_VAR).ok();
    let config = load_config(&paths.root.join(CONFIG_FILE_NAME), ticks_override.as_deref())?;
    let defs = compile_actor_defs(&paths.actors_dir).map_err(|error| error.to_string())?;
    let spawns = spawn_requests_from_defs(&defs);

    info!(
        root = %paths.root.display(),
        ticks = config.ticks,
        fixed_dt_seconds = config.fixed_dt_seconds,
        actor_defs = defs.len(),
        spawns = spawns.len(),
        "playground_configured"
    );

    Ok(AppWiring {
        paths,
        config,
        spawns,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
