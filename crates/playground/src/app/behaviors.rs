use glam::Vec3;
use sandbox::assertions::ensure_finite_vec3;
use sandbox::collections::min_by_score;
use sandbox::math::{format_vec3, yaw_rotation};
use sandbox::{Behavior, BehaviorContext, BehaviorError, PhysicsBody, PhysicsPreset};
use tracing::{debug, info};

const GRAVITY_UNITS_PER_SECOND_SQ: f32 = 9.81;
const GROUND_HEIGHT: f32 = 0.0;

/// Falls while the owner is gravity-driven; lands on the ground plane.
#[derive(Debug, Default)]
pub(crate) struct Faller {
    vertical_speed: f32,
}

impl Behavior for Faller {
    fn name(&self) -> &str {
        "faller"
    }

    fn on_update(
        &mut self,
        dt_seconds: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<(), BehaviorError> {
        let actor = ctx.actor_mut()?;
        if !actor.is_gravity_enabled() || actor.is_kinematic() {
            self.vertical_speed = 0.0;
            return Ok(());
        }

        self.vertical_speed -= GRAVITY_UNITS_PER_SECOND_SQ * dt_seconds;
        let position = &mut actor.transform.position;
        position.y += self.vertical_speed * dt_seconds;
        if position.y <= GROUND_HEIGHT {
            position.y = GROUND_HEIGHT;
            self.vertical_speed = 0.0;
        }
        ensure_finite_vec3("faller.position", *position)?;
        Ok(())
    }
}

/// Alternates the owner between two presets every `period_seconds`.
#[derive(Debug)]
pub(crate) struct PhaseShifter {
    period_seconds: f32,
    elapsed_seconds: f32,
    phases: [PhysicsPreset; 2],
    current: usize,
}

impl PhaseShifter {
    pub(crate) fn new(period_seconds: f32, first: PhysicsPreset, second: PhysicsPreset) -> Self {
        Self {
            period_seconds,
            elapsed_seconds: 0.0,
            phases: [first, second],
            current: 0,
        }
    }
}

impl Behavior for PhaseShifter {
    fn name(&self) -> &str {
        "phase_shifter"
    }

    fn on_start(&mut self, ctx: &mut BehaviorContext<'_>) -> Result<(), BehaviorError> {
        ctx.set_physics_preset(self.phases[self.current])
    }

    fn on_update(
        &mut self,
        dt_seconds: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<(), BehaviorError> {
        self.elapsed_seconds += dt_seconds;
        if self.elapsed_seconds < self.period_seconds {
            return Ok(());
        }
        self.elapsed_seconds -= self.period_seconds;
        self.current = (self.current + 1) % self.phases.len();
        let next = self.phases[self.current];
        ctx.set_physics_preset(next)?;
        info!(
            actor = %ctx.actor()?.name,
            preset = %next,
            "phase_shifted"
        );
        Ok(())
    }
}

/// Turns a kinematic owner about the up axis. Dynamic owners are left to
/// the physics host.
#[derive(Debug)]
pub(crate) struct Spinner {
    radians_per_second: f32,
    yaw_radians: f32,
}

impl Spinner {
    pub(crate) fn new(radians_per_second: f32) -> Self {
        Self {
            radians_per_second,
            yaw_radians: 0.0,
        }
    }
}

impl Behavior for Spinner {
    fn name(&self) -> &str {
        "spinner"
    }

    fn on_update(
        &mut self,
        dt_seconds: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<(), BehaviorError> {
        let actor = ctx.actor_mut()?;
        if !actor.is_kinematic() {
            return Ok(());
        }
        self.yaw_radians = (self.yaw_radians + self.radians_per_second * dt_seconds)
            .rem_euclid(std::f32::consts::TAU);
        actor.transform.rotation = yaw_rotation(self.yaw_radians);
        Ok(())
    }
}

/// Tracks which preset the nearest other actor is in and logs changes.
#[derive(Debug, Default)]
pub(crate) struct Watcher {
    last_seen: Option<(String, Option<PhysicsPreset>)>,
}

impl Watcher {
    #[cfg(test)]
    pub(crate) fn last_seen(&self) -> Option<&(String, Option<PhysicsPreset>)> {
        self.last_seen.as_ref()
    }
}

impl Behavior for Watcher {
    fn name(&self) -> &str {
        "watcher"
    }

    fn on_update(
        &mut self,
        _dt_seconds: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<(), BehaviorError> {
        let owner_id = ctx.owner();
        let origin: Vec3 = ctx.actor()?.transform.position;
        let nearest = min_by_score(
            ctx.world()
                .actors()
                .iter()
                .filter(|actor| actor.id != owner_id),
            |actor| actor.transform.position.distance_squared(origin),
        );
        let Some(nearest) = nearest else {
            self.last_seen = None;
            return Ok(());
        };

        let seen = (nearest.name.clone(), ctx.physics_preset_of(nearest.id)?);
        if self.last_seen.as_ref() != Some(&seen) {
            debug!(
                target_actor = %seen.0,
                preset = ?seen.1,
                at = %format_vec3(nearest.transform.position),
                "watcher_target_changed"
            );
            self.last_seen = Some(seen);
        }
        Ok(())
    }
}

/// Default behavior set for an actor spawned with `preset`.
pub(crate) fn behaviors_for_preset(preset: PhysicsPreset) -> Vec<Box<dyn Behavior>> {
    let mut behaviors: Vec<Box<dyn Behavior>> = vec![Box::new(Faller::default())];
    match preset {
        PhysicsPreset::Ghost => behaviors.push(Box::new(PhaseShifter::new(
            1.0,
            PhysicsPreset::Ghost,
            PhysicsPreset::Character,
        ))),
        PhysicsPreset::Solid => behaviors.push(Box::new(Spinner::new(1.5))),
        PhysicsPreset::Object => {}
        PhysicsPreset::Character => behaviors.push(Box::new(Watcher::default())),
    }
    behaviors
}

#[cfg(test)]
mod tests {
    use sandbox::{ActorWorld, BehaviorHost, PhysicsPresetExt, Transform};

    use super::*;

    fn host_with(
        name: &str,
        position: Vec3,
        preset: PhysicsPreset,
    ) -> (BehaviorHost, sandbox::ActorId) {
        let mut world = ActorWorld::new();
        let id = world.spawn(name, Transform::at(position));
        world.apply_pending();
        world.find_mut(id).expect("actor").set_physics_preset(preset);
        (BehaviorHost::new(world), id)
    }

    #[test]
    fn faller_lands_on_ground_and_ignores_ghosts() {
        let (mut host, id) = host_with("rock", Vec3::new(0.0, 1.0, 0.0), PhysicsPreset::Object);
        host.attach(id, Box::new(Faller::default())).expect("attach");
        host.run_ticks(120, 1.0 / 60.0).expect("ticks");
        assert_eq!(host.world().find(id).expect("rock").transform.position.y, 0.0);

        let (mut host, id) = host_with("wisp", Vec3::new(0.0, 1.0, 0.0), PhysicsPreset::Ghost);
        host.attach(id, Box::new(Faller::default())).expect("attach");
        host.run_ticks(10, 1.0 / 60.0).expect("ticks");
        assert_eq!(host.world().find(id).expect("wisp").transform.position.y, 1.0);
    }

    #[test]
    fn phase_shifter_alternates_presets() {
        let (mut host, id) = host_with("wisp", Vec3::ZERO, PhysicsPreset::Object);
        host.attach(
            id,
            Box::new(PhaseShifter::new(
                0.5,
                PhysicsPreset::Ghost,
                PhysicsPreset::Character,
            )),
        )
        .expect("attach");

        host.tick(0.25).expect("tick");
        assert_eq!(
            host.world().find(id).expect("wisp").physics_preset(),
            Some(PhysicsPreset::Ghost)
        );
        host.tick(0.25).expect("tick");
        assert_eq!(
            host.world().find(id).expect("wisp").physics_preset(),
            Some(PhysicsPreset::Character)
        );
        host.run_ticks(2, 0.25).expect("ticks");
        assert_eq!(
            host.world().find(id).expect("wisp").physics_preset(),
            Some(PhysicsPreset::Ghost)
        );
    }

    #[test]
    fn spinner_only_turns_kinematic_owners() {
        let (mut host, id) = host_with("wall", Vec3::ZERO, PhysicsPreset::Solid);
        host.attach(id, Box::new(Spinner::new(1.0))).expect("attach");
        host.tick(0.5).expect("tick");
        let rotation = host.world().find(id).expect("wall").transform.rotation;
        assert!(rotation.angle_between(yaw_rotation(0.5)) < 1.0e-4);

        let (mut host, id) = host_with("crate", Vec3::ZERO, PhysicsPreset::Object);
        host.attach(id, Box::new(Spinner::new(1.0))).expect("attach");
        host.tick(0.5).expect("tick");
        assert_eq!(
            host.world().find(id).expect("crate").transform.rotation,
            glam::Quat::IDENTITY
        );
    }

    #[test]
    fn behaviors_for_preset_always_include_faller() {
        for preset in PhysicsPreset::ALL {
            let names = behaviors_for_preset(preset)
                .iter()
                .map(|behavior| behavior.name().to_string())
                .collect::<Vec<_>>();
            assert_eq!(names[0], "faller", "preset={preset}");
        }
        assert_eq!(behaviors_for_preset(PhysicsPreset::Object).len(), 1);
    }

    #[test]
    fn watcher_sees_nearest_actor_preset() {
        let mut world = ActorWorld::new();
        let npc = world.spawn("npc", Transform::default());
        let near = world.spawn("near", Transform::at(Vec3::new(1.0, 0.0, 0.0)));
        world.spawn("far", Transform::at(Vec3::new(9.0, 0.0, 0.0)));
        world.apply_pending();
        world
            .find_mut(near)
            .expect("near")
            .set_physics_preset(PhysicsPreset::Solid);

        let mut watcher = Watcher::default();
        watcher
            .on_update(0.1, &mut BehaviorContext::new(npc, &mut world))
            .expect("update");
        assert_eq!(
            watcher.last_seen(),
            Some(&("near".to_string(), Some(PhysicsPreset::Solid)))
        );

        world.find_mut(near).expect("near").set_kinematic(false);
        watcher
            .on_update(0.1, &mut BehaviorContext::new(npc, &mut world))
            .expect("update");
        assert_eq!(watcher.last_seen(), Some(&("near".to_string(), None)));
    }

    #[test]
    fn watcher_alone_sees_nothing() {
        let mut world = ActorWorld::new();
        let npc = world.spawn("npc", Transform::default());
        world.apply_pending();
        let mut watcher = Watcher::default();
        watcher
            .on_update(0.1, &mut BehaviorContext::new(npc, &mut world))
            .expect("update");
        assert_eq!(watcher.last_seen(), None);
    }
}
