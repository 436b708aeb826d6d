//! World transform type definition

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Euler order shared by every conversion: Z, then X, then Y about world axes.
pub const EULER_ORDER: EulerRot = EulerRot::YXZ;

/// Position and orientation of an object in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Rotation as Euler angles in degrees
    pub fn euler_degrees(&self) -> Vec3 {
        quat_to_euler_degrees(self.rotation)
    }
}

/// Convert Euler angles in degrees (x, y, z) to a quaternion
pub fn euler_degrees_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(
        EULER_ORDER,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Decompose a quaternion into Euler angles in degrees (x, y, z)
pub fn quat_to_euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EULER_ORDER);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euler_round_trip_keeps_yaw() {
        let euler = Vec3::new(20.0, 45.0, -10.0);
        let back = quat_to_euler_degrees(euler_degrees_to_quat(euler));
        assert_relative_eq!(back.x, euler.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, euler.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, euler.z, epsilon = 1e-3);
    }

    #[test]
    fn test_yaw_rotates_about_world_up() {
        let rotation = euler_degrees_to_quat(Vec3::new(0.0, 90.0, 0.0));
        let forward = rotation * Vec3::Z;
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.0, epsilon = 1e-5);
    }
}
