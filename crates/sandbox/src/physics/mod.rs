mod body;
mod preset;
mod table;

pub use body::{read_attributes, write_attributes, AttributeVector, PhysicsAttributes, PhysicsBody};
pub use preset::{
    apply_preset, get_physics_preset, resolve_preset, set_physics_preset,
    set_physics_preset_by_name, PhysicsPreset, PhysicsPresetExt, PHYSICS_PRESET_TABLE,
};
pub use table::{DuplicatePresetError, InvalidPresetError, PresetTable};
