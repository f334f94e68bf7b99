use glam::Vec3;
use sandbox::{ActorDefDatabase, BehaviorHost, PhysicsPreset, PhysicsPresetExt, Transform};
use tracing::info;

use super::behaviors::behaviors_for_preset;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpawnRequest {
    pub(crate) name: String,
    pub(crate) preset: PhysicsPreset,
    pub(crate) position: Vec3,
}

/// Used when no actor defs are found on disk.
pub(crate) fn fallback_spawns() -> Vec<SpawnRequest> {
    [
        ("crate", PhysicsPreset::Object, Vec3::new(2.0, 3.0, 0.0)),
        ("npc", PhysicsPreset::Character, Vec3::new(0.0, 1.0, 0.0)),
        ("turnstile", PhysicsPreset::Solid, Vec3::new(-2.0, 0.0, 1.0)),
        ("wisp", PhysicsPreset::Ghost, Vec3::new(0.0, 2.0, -3.0)),
    ]
    .into_iter()
    .map(|(name, preset, position)| SpawnRequest {
        name: name.to_string(),
        preset,
        position,
    })
    .collect()
}

pub(crate) fn spawn_requests_from_defs(defs: &ActorDefDatabase) -> Vec<SpawnRequest> {
    if defs.is_empty() {
        return fallback_spawns();
    }
    defs.actor_defs()
        .iter()
        .map(|def| SpawnRequest {
            name: def.def_name.clone(),
            preset: def.physics_preset,
            position: def.spawn,
        })
        .collect()
}

pub(crate) fn populate_host(
    host: &mut BehaviorHost,
    requests: &[SpawnRequest],
) -> Result<(), String> {
    for request in requests {
        let id = host
            .world_mut()
            .spawn(request.name.clone(), Transform::at(request.position));
        host.world_mut().apply_pending();
        let actor = host
            .world_mut()
            .find_mut(id)
            .ok_or_else(|| format!("spawned actor '{}' is missing", request.name))?;
        actor.set_physics_preset(request.preset);

        for behavior in behaviors_for_preset(request.preset) {
            host.attach(id, behavior)
                .map_err(|error| format!("attach behavior to '{}': {error}", request.name))?;
        }
        info!(actor = %request.name, preset = %request.preset, "actor_spawned");
    }
    Ok(())
}
