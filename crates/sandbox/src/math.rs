use glam::{Quat, Vec3};

const DIRECTION_EPSILON: f32 = 1.0e-6;

pub fn format_vec3(value: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", value.x, value.y, value.z)
}

pub fn format_quat(value: Quat) -> String {
    format!(
        "({:.3}, {:.3}, {:.3}, {:.3})",
        value.x, value.y, value.z, value.w
    )
}

pub fn approx_eq_vec3(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a - b).abs().max_element() <= tolerance
}

/// Rotation about +Y, the sandbox's up axis.
pub fn yaw_rotation(radians: f32) -> Quat {
    Quat::from_rotation_y(radians)
}

/// Local -Z rotated into world space.
pub fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// Normalized direction from `from` to `to` on the XZ plane.
pub fn flat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if delta.length_squared() <= DIRECTION_EPSILON * DIRECTION_EPSILON {
        return None;
    }
    Some(delta.normalize())
}

pub fn clamp_length(value: Vec3, max_length: f32) -> Vec3 {
    value.clamp_length_max(max_length.max(0.0))
}
