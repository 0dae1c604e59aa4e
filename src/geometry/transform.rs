use super::Vector3;
use glam::{Mat3, Quat};

/// Rigid transform from a surface's local frame to world space.
///
/// Rotation is carried as an orthonormal `Mat3` plus its (transpose-equal)
/// inverse so `to_local` never needs to invert a matrix at query time. 2-D
/// callers build this from a single Z-axis angle; 3-D callers build it from
/// a quaternion. Both collapse to the same representation, so there is one
/// `Transform` type rather than separate 2-D/3-D variants.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    translation: Vector3,
    rotation: Mat3,
    rotation_inv: Mat3,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            translation: Vector3::ZERO,
            rotation: Mat3::IDENTITY,
            rotation_inv: Mat3::IDENTITY,
        }
    }

    /// Build from a translation and a 3-D rotation quaternion.
    pub fn from_quaternion(translation: Vector3, rotation: Quat) -> Self {
        let rotation = Mat3::from_quat(rotation.normalize());
        Self {
            translation,
            rotation,
            rotation_inv: rotation.transpose(),
        }
    }

    /// Build from a translation and a 2-D rotation angle (radians, about Z).
    pub fn from_angle_2d(translation: Vector3, angle: f32) -> Self {
        let rotation = Mat3::from_rotation_z(angle);
        Self {
            translation,
            rotation,
            rotation_inv: rotation.transpose(),
        }
    }

    /// Translation-only transform (identity rotation).
    pub fn from_translation(translation: Vector3) -> Self {
        Self::identity().with_translation(translation)
    }

    pub fn with_translation(mut self, translation: Vector3) -> Self {
        self.translation = translation;
        self
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Map a world-space point into this transform's local frame.
    pub fn to_local_point(&self, world: Vector3) -> Vector3 {
        self.rotation_inv * (world - self.translation)
    }

    /// Map a local-space point into world space.
    pub fn to_world_point(&self, local: Vector3) -> Vector3 {
        self.rotation * local + self.translation
    }

    /// Map a world-space direction into this transform's local frame
    /// (rotation only, no translation).
    pub fn to_local_direction(&self, world: Vector3) -> Vector3 {
        self.rotation_inv * world
    }

    /// Map a local-space direction into world space.
    pub fn to_world_direction(&self, local: Vector3) -> Vector3 {
        self.rotation * local
    }
}
