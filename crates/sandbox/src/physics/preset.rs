use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::body::{read_attributes, write_attributes, PhysicsAttributes, PhysicsBody};
use super::table::{InvalidPresetError, PresetTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicsPreset {
    /// Passes through everything and ignores gravity.
    Ghost,
    /// Blocks others but is never moved by them.
    Solid,
    /// Loose prop that falls and tumbles.
    Object,
    /// Falls like an object but stays upright.
    Character,
}

impl PhysicsPreset {
    pub const ALL: [PhysicsPreset; 4] = [
        PhysicsPreset::Ghost,
        PhysicsPreset::Solid,
        PhysicsPreset::Object,
        PhysicsPreset::Character,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PhysicsPreset::Ghost => "GHOST",
            PhysicsPreset::Solid => "SOLID",
            PhysicsPreset::Object => "OBJECT",
            PhysicsPreset::Character => "CHARACTER",
        }
    }

    pub const fn attributes(self) -> PhysicsAttributes {
        match self {
            PhysicsPreset::Ghost => PhysicsAttributes::new(false, true, false, false),
            PhysicsPreset::Solid => PhysicsAttributes::new(true, true, false, false),
            PhysicsPreset::Object => PhysicsAttributes::new(true, false, true, false),
            PhysicsPreset::Character => PhysicsAttributes::new(true, false, true, true),
        }
    }

    pub fn allowed_names() -> String {
        Self::ALL
            .iter()
            .map(|preset| preset.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PhysicsPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhysicsPreset {
    type Err = InvalidPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| InvalidPresetError {
                name: s.to_string(),
            })
    }
}

const PHYSICS_PRESET_ENTRIES: [(PhysicsPreset, PhysicsAttributes); 4] = [
    (PhysicsPreset::Ghost, PhysicsPreset::Ghost.attributes()),
    (PhysicsPreset::Solid, PhysicsPreset::Solid.attributes()),
    (PhysicsPreset::Object, PhysicsPreset::Object.attributes()),
    (PhysicsPreset::Character, PhysicsPreset::Character.attributes()),
];

pub static PHYSICS_PRESET_TABLE: PresetTable<'static, PhysicsPreset, PhysicsAttributes> =
    PresetTable::from_unique(&PHYSICS_PRESET_ENTRIES);

pub fn apply_preset<B: PhysicsBody + ?Sized>(body: &mut B, preset: PhysicsPreset) {
    write_attributes(body, preset.attributes());
    debug!(preset = %preset, "physics_preset_applied");
}

pub fn resolve_preset(attributes: &PhysicsAttributes) -> Option<PhysicsPreset> {
    PHYSICS_PRESET_TABLE.resolve(attributes)
}

pub fn set_physics_preset<B: PhysicsBody + ?Sized>(body: &mut B, preset: PhysicsPreset) {
    apply_preset(body, preset);
}

/// Parses `name` before touching `body`, so a bad name leaves it unchanged.
pub fn set_physics_preset_by_name<B: PhysicsBody + ?Sized>(
    body: &mut B,
    name: &str,
) -> Result<(), InvalidPresetError> {
    let preset = name.parse::<PhysicsPreset>()?;
    apply_preset(body, preset);
    Ok(())
}

pub fn get_physics_preset<B: PhysicsBody + ?Sized>(body: &B) -> Option<PhysicsPreset> {
    resolve_preset(&read_attributes(body))
}

pub trait PhysicsPresetExt: PhysicsBody {
    fn set_physics_preset(&mut self, preset: PhysicsPreset) {
        set_physics_preset(self, preset);
    }

    fn set_physics_preset_by_name(&mut self, name: &str) -> Result<(), InvalidPresetError> {
        set_physics_preset_by_name(self, name)
    }

    fn physics_preset(&self) -> Option<PhysicsPreset> {
        get_physics_preset(self)
    }

    fn physics_attributes(&self) -> PhysicsAttributes {
        read_attributes(self)
    }
}

impl<B: PhysicsBody + ?Sized> PhysicsPresetExt for B {}

#[cfg(test)]
mod tests {
    use super::super::body::tests::RecordingBody;
    use super::*;

    fn attrs(solid: bool, kinematic: bool, gravity: bool, upright: bool) -> PhysicsAttributes {
        PhysicsAttributes::new(solid, kinematic, gravity, upright)
    }

    #[test]
    fn every_preset_round_trips_through_a_body() {
        for preset in PhysicsPreset::ALL {
            let mut body = RecordingBody::default();
            set_physics_preset(&mut body, preset);
            assert_eq!(get_physics_preset(&body), Some(preset), "preset={preset}");
        }
    }

    #[test]
    fn canonical_table_lists_each_preset_once_in_declaration_order() {
        let listed = PHYSICS_PRESET_TABLE.presets().collect::<Vec<_>>();
        assert_eq!(listed, PhysicsPreset::ALL.to_vec());
        for (preset, attributes) in PHYSICS_PRESET_TABLE.entries() {
            assert_eq!(*attributes, preset.attributes());
        }
        PresetTable::new(PHYSICS_PRESET_TABLE.entries()).expect("no duplicate presets");
    }

    #[test]
    fn canonical_table_is_injective() {
        for (i, (_, a)) in PHYSICS_PRESET_TABLE.entries().iter().enumerate() {
            for (_, b) in &PHYSICS_PRESET_TABLE.entries()[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn character_scenario_matches_reference_values() {
        let mut body = RecordingBody::default();
        set_physics_preset(&mut body, PhysicsPreset::Character);
        assert_eq!(body.attributes, attrs(true, false, true, true));

        assert_eq!(
            resolve_preset(&attrs(true, false, true, true)),
            Some(PhysicsPreset::Character)
        );
        assert_eq!(
            resolve_preset(&attrs(false, true, false, false)),
            Some(PhysicsPreset::Ghost)
        );
        assert_eq!(
            resolve_preset(&attrs(true, true, false, false)),
            Some(PhysicsPreset::Solid)
        );
        assert_eq!(
            resolve_preset(&attrs(true, false, true, false)),
            Some(PhysicsPreset::Object)
        );
        assert_eq!(resolve_preset(&attrs(false, false, false, false)), None);
    }

    #[test]
    fn unknown_name_fails_and_leaves_body_untouched() {
        let mut body = RecordingBody::default();
        set_physics_preset(&mut body, PhysicsPreset::Ghost);
        let calls_before = body.setter_calls;

        let err = set_physics_preset_by_name(&mut body, "FLYING").expect_err("invalid preset");
        assert_eq!(err.name, "FLYING");
        assert_eq!(body.setter_calls, calls_before);
        assert_eq!(get_physics_preset(&body), Some(PhysicsPreset::Ghost));
    }

    #[test]
    fn names_are_exact_upper_case_identifiers() {
        for preset in PhysicsPreset::ALL {
            assert_eq!(preset.name().parse::<PhysicsPreset>(), Ok(preset));
        }
        assert!("ghost".parse::<PhysicsPreset>().is_err());
        assert!(" GHOST".parse::<PhysicsPreset>().is_err());
        assert!("".parse::<PhysicsPreset>().is_err());
        assert_eq!(
            PhysicsPreset::allowed_names(),
            "GHOST, SOLID, OBJECT, CHARACTER"
        );
    }

    #[test]
    fn custom_attribute_combination_is_not_an_error() {
        let mut body = RecordingBody::default();
        body.set_physics_preset(PhysicsPreset::Object);
        body.enable_keep_upright(false);
        body.set_kinematic(true);
        assert_eq!(body.physics_preset(), None);
        assert_eq!(body.physics_attributes(), attrs(true, true, true, false));
    }

    #[test]
    fn by_name_applies_through_extension_trait() {
        let mut body = RecordingBody::default();
        body.set_physics_preset_by_name("SOLID").expect("valid");
        assert_eq!(body.physics_preset(), Some(PhysicsPreset::Solid));
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&PhysicsPreset::Character).expect("encode");
        assert_eq!(json, "\"CHARACTER\"");
        let decoded: PhysicsPreset = serde_json::from_str("\"GHOST\"").expect("decode");
        assert_eq!(decoded, PhysicsPreset::Ghost);
        assert!(serde_json::from_str::<PhysicsPreset>("\"FLYING\"").is_err());
    }
}
