use std::collections::HashMap;

use glam::Vec3;

use crate::physics::PhysicsPreset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorDefId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct ActorDef {
    pub id: ActorDefId,
    pub def_name: String,
    pub label: String,
    pub physics_preset: PhysicsPreset,
    pub spawn: Vec3,
}

#[derive(Debug, Default, Clone)]
pub struct ActorDefDatabase {
    actor_defs: Vec<ActorDef>,
    ids_by_name: HashMap<String, ActorDefId>,
}

impl ActorDefDatabase {
    /// `actor_defs` must already be sorted by `def_name`; ids follow that order.
    pub(crate) fn from_sorted_defs(mut actor_defs: Vec<ActorDef>) -> Self {
        let mut ids_by_name = HashMap::with_capacity(actor_defs.len());
        for (idx, def) in actor_defs.iter_mut().enumerate() {
            let id = ActorDefId(idx as u32);
            def.id = id;
            ids_by_name.insert(def.def_name.clone(), id);
        }
        Self {
            actor_defs,
            ids_by_name,
        }
    }

    pub fn id_by_name(&self, name: &str) -> Option<ActorDefId> {
        self.ids_by_name.get(name).copied()
    }

    pub fn get(&self, id: ActorDefId) -> Option<&ActorDef> {
        self.actor_defs.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&ActorDef> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn actor_defs(&self) -> &[ActorDef] {
        &self.actor_defs
    }

    pub fn len(&self) -> usize {
        self.actor_defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actor_defs.is_empty()
    }
}
