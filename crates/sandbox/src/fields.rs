use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::actor::Transform;
use crate::physics::{PhysicsBody, PhysicsPreset, PhysicsPresetExt};

/// `{"preset":"GHOST"}`, or `{"preset":null}` for a custom attribute mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresetField {
    pub preset: Option<PhysicsPreset>,
}

impl PresetField {
    pub fn read_from<B: PhysicsBody + ?Sized>(body: &B) -> Self {
        Self {
            preset: body.physics_preset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformField {
    pub position: [f32; 3],
    /// `[x, y, z, w]`
    pub rotation: [f32; 4],
}

impl From<Transform> for TransformField {
    fn from(transform: Transform) -> Self {
        Self {
            position: transform.position.to_array(),
            rotation: transform.rotation.to_array(),
        }
    }
}

impl From<TransformField> for Transform {
    fn from(field: TransformField) -> Self {
        Self {
            position: Vec3::from_array(field.position),
            rotation: Quat::from_array(field.rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::actor::{ActorWorld, Transform};

    #[test]
    fn preset_field_json_shape() {
        let field = PresetField {
            preset: Some(PhysicsPreset::Ghost),
        };
        assert_eq!(
            serde_json::to_value(field).expect("encode"),
            json!({ "preset": "GHOST" })
        );
        let none: PresetField = serde_json::from_value(json!({ "preset": null })).expect("decode");
        assert_eq!(none.preset, None);
        assert!(serde_json::from_value::<PresetField>(json!({ "preset": "FLYING" })).is_err());
    }

    #[test]
    fn preset_field_reads_actor_state() {
        let mut world = ActorWorld::new();
        let id = world.spawn("npc", Transform::default());
        world.apply_pending();
        let actor = world.find_mut(id).expect("actor");
        actor.set_physics_preset(PhysicsPreset::Character);
        assert_eq!(
            PresetField::read_from(&*actor).preset,
            Some(PhysicsPreset::Character)
        );
        actor.set_kinematic(true);
        assert_eq!(PresetField::read_from(&*actor).preset, None);
    }

    #[test]
    fn transform_field_json_shape_and_conversion() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
        };
        let field = TransformField::from(transform);
        assert_eq!(
            serde_json::to_value(field).expect("encode"),
            json!({ "position": [1.0, 2.0, 3.0], "rotation": [0.0, 0.0, 0.0, 1.0] })
        );
        assert_eq!(Transform::from(field), transform);
    }
}
