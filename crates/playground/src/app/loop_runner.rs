use std::process::ExitCode;

use sandbox::{BehaviorHost, PhysicsPresetExt};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::dump::{dump_world, write_dump};
use super::spawning::populate_host;

pub(crate) fn run(wiring: Result<AppWiring, String>) -> ExitCode {
    let result = wiring.and_then(run_playground);
    if let Err(err) = result {
        error!(error = %err, "playground_failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_playground(app: AppWiring) -> Result<(), String> {
    let mut host = BehaviorHost::default();
    populate_host(&mut host, &app.spawns)?;

    let report = host
        .run_ticks(app.config.ticks, app.config.fixed_dt_seconds)
        .map_err(|error| error.to_string())?;
    info!(
        ticks = host.tick_count(),
        started = report.started,
        updated = report.updated,
        failed = report.failed,
        detached = report.detached,
        "playground_ran"
    );

    for actor in host.world().actors() {
        let preset = actor
            .physics_preset()
            .map(|preset| preset.to_string())
            .unwrap_or_else(|| "custom".to_string());
        info!(
            actor = %actor.name,
            preset = %preset,
            position = %sandbox::math::format_vec3(actor.transform.position),
            "actor_final_state"
        );
    }
    for (label, timing) in host.timings() {
        info!(
            behavior = %label,
            avg_ms = timing.avg_ms,
            max_ms = timing.max_ms,
            samples = timing.samples,
            "behavior_timing"
        );
    }

    if let Some(dump_path) = &app.config.dump_path {
        let path = app.paths.root.join(dump_path);
        write_dump(&path, &dump_world(host.world()))?;
        info!(path = %path.display(), "actor_dump_written");
    }
    Ok(())
}
