use glam::{Quat, Vec3};

use crate::physics::{PhysicsAttributes, PhysicsBody, PhysicsPreset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub transform: Transform,
    physics: PhysicsAttributes,
}

impl Actor {
    fn new(id: ActorId, name: String, transform: Transform) -> Self {
        Self {
            id,
            name,
            transform,
            physics: PhysicsPreset::Object.attributes(),
        }
    }
}

impl PhysicsBody for Actor {
    fn set_solid(&mut self, solid: bool) {
        self.physics.solid = solid;
    }

    fn is_solid(&self) -> bool {
        self.physics.solid
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.physics.kinematic = kinematic;
    }

    fn is_kinematic(&self) -> bool {
        self.physics.kinematic
    }

    fn enable_gravity(&mut self, enabled: bool) {
        self.physics.affected_by_gravity = enabled;
    }

    fn is_gravity_enabled(&self) -> bool {
        self.physics.affected_by_gravity
    }

    fn enable_keep_upright(&mut self, enabled: bool) {
        self.physics.keep_upright = enabled;
    }

    fn is_keep_upright_enabled(&self) -> bool {
        self.physics.keep_upright
    }
}

#[derive(Debug, Default)]
pub struct ActorIdAllocator {
    next: u64,
}

impl ActorIdAllocator {
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Arena of live actors. Spawns and despawns are queued and take effect on
/// [`ActorWorld::apply_pending`], so iteration order is stable within a tick.
#[derive(Debug, Default)]
pub struct ActorWorld {
    allocator: ActorIdAllocator,
    actors: Vec<Actor>,
    pending_spawns: Vec<Actor>,
    pending_despawns: Vec<ActorId>,
}

impl ActorWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> ActorId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Actor::new(id, name.into(), transform));
        id
    }

    pub fn despawn(&mut self, id: ActorId) -> bool {
        let exists_now = self.actors.iter().any(|actor| actor.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|actor| actor.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_spawns.is_empty() {
            self.actors.append(&mut self.pending_spawns);
        }

        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort();
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.actors
                .retain(|actor| pending.binary_search(&actor.id).is_err());
            self.pending_despawns.clear();
        }
    }

    pub fn clear(&mut self) {
        self.actors.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn find(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn find_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsPresetExt;

    #[test]
    fn spawn_is_deferred_until_apply_pending() {
        let mut world = ActorWorld::new();
        let id = world.spawn("crate", Transform::default());
        assert!(world.find(id).is_none());
        world.apply_pending();
        assert_eq!(world.find(id).expect("spawned").name, "crate");
    }

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let mut world = ActorWorld::new();
        let a = world.spawn("a", Transform::default());
        world.apply_pending();
        assert!(world.despawn(a));
        world.apply_pending();
        let b = world.spawn("b", Transform::default());
        assert!(b > a);
    }

    #[test]
    fn despawn_unknown_id_returns_false() {
        let mut world = ActorWorld::new();
        assert!(!world.despawn(ActorId(42)));
    }

    #[test]
    fn despawn_of_pending_spawn_removes_it_on_apply() {
        let mut world = ActorWorld::new();
        let id = world.spawn("short_lived", Transform::default());
        assert!(world.despawn(id));
        world.apply_pending();
        assert!(world.find(id).is_none());
        assert_eq!(world.actor_count(), 0);
    }

    #[test]
    fn iteration_follows_spawn_order() {
        let mut world = ActorWorld::new();
        let names = ["c", "a", "b"];
        for name in names {
            world.spawn(name, Transform::default());
        }
        world.apply_pending();
        let listed = world
            .actors()
            .iter()
            .map(|actor| actor.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(listed, names);
    }

    #[test]
    fn new_actor_starts_as_object_preset() {
        let mut world = ActorWorld::new();
        let id = world.spawn("prop", Transform::at(Vec3::new(1.0, 2.0, 3.0)));
        world.apply_pending();
        let actor = world.find(id).expect("actor");
        assert_eq!(actor.physics_preset(), Some(PhysicsPreset::Object));
        assert_eq!(actor.transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn actor_preset_changes_are_visible_through_world_lookup() {
        let mut world = ActorWorld::new();
        let id = world.spawn("npc", Transform::default());
        world.apply_pending();
        world
            .find_mut(id)
            .expect("actor")
            .set_physics_preset(PhysicsPreset::Character);
        assert_eq!(
            world.find_by_name("npc").expect("npc").physics_preset(),
            Some(PhysicsPreset::Character)
        );
    }
}
