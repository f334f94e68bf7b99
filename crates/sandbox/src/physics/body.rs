use serde::{Deserialize, Serialize};

/// Physics attribute surface of a host actor.
///
/// The four attributes are independent: setting one never changes another,
/// and every setter is idempotent.
pub trait PhysicsBody {
    fn set_solid(&mut self, solid: bool);
    fn is_solid(&self) -> bool;

    fn set_kinematic(&mut self, kinematic: bool);
    fn is_kinematic(&self) -> bool;

    fn enable_gravity(&mut self, enabled: bool);
    fn is_gravity_enabled(&self) -> bool;

    fn enable_keep_upright(&mut self, enabled: bool);
    fn is_keep_upright_enabled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PhysicsAttributes {
    pub solid: bool,
    pub kinematic: bool,
    pub affected_by_gravity: bool,
    pub keep_upright: bool,
}

impl PhysicsAttributes {
    pub const fn new(
        solid: bool,
        kinematic: bool,
        affected_by_gravity: bool,
        keep_upright: bool,
    ) -> Self {
        Self {
            solid,
            kinematic,
            affected_by_gravity,
            keep_upright,
        }
    }
}

/// A fixed set of values that can be read from and written onto a target.
///
/// Implemented by attribute vectors so a [`super::PresetTable`] can apply and
/// classify them without knowing the concrete fields.
pub trait AttributeVector<B: ?Sized>: Copy + PartialEq {
    fn read_from(target: &B) -> Self;
    fn write_to(&self, target: &mut B);
}

impl<B: PhysicsBody + ?Sized> AttributeVector<B> for PhysicsAttributes {
    // Four separate queries; not atomic against concurrent host mutation.
    fn read_from(target: &B) -> Self {
        Self {
            solid: target.is_solid(),
            kinematic: target.is_kinematic(),
            affected_by_gravity: target.is_gravity_enabled(),
            keep_upright: target.is_keep_upright_enabled(),
        }
    }

    fn write_to(&self, target: &mut B) {
        target.set_solid(self.solid);
        target.set_kinematic(self.kinematic);
        target.enable_gravity(self.affected_by_gravity);
        target.enable_keep_upright(self.keep_upright);
    }
}

pub fn read_attributes<B: PhysicsBody + ?Sized>(body: &B) -> PhysicsAttributes {
    PhysicsAttributes::read_from(body)
}

pub fn write_attributes<B: PhysicsBody + ?Sized>(body: &mut B, attributes: PhysicsAttributes) {
    attributes.write_to(body);
}
