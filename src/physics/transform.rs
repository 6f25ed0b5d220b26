//! Rigid-body transform.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation (radians) and scale of a rigid body.
///
/// Rotation is stored as Euler angles so angular velocity can be integrated
/// component-wise, the same way linear velocity is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X first, then Y, then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Set the Euler rotation in radians.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion (`Rz * Ry * Rx`).
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z,
            self.rotation.y,
            self.rotation.x,
        )
    }

    /// Model matrix (translation * rotation * scale).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::new(2.0, 1.0, 1.0));

        // (1, 0, 0) -> scale (2, 0, 0) -> rotate 90deg about Z (0, 2, 0) -> translate
        let p = t.to_matrix().transform_point3(Vec3::X);
        let eps = 1e-5;
        assert!((p - Vec3::new(1.0, 4.0, 3.0)).length() < eps, "got {p}");
    }

    #[test]
    fn test_euler_order_is_x_then_y_then_z() {
        let t = Transform::identity().with_rotation(Vec3::new(
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
            0.0,
        ));

        // Y axis -> Rx(90) -> Z axis -> Ry(90) -> X axis
        let p = t.to_matrix().transform_point3(Vec3::Y);
        let eps = 1e-5;
        assert!((p - Vec3::X).length() < eps, "got {p}");
    }
}
