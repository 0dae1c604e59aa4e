//! Rigid-body collider: resolves particle-surface penetration with
//! restitution and friction.

use crate::geometry::{Dimension, Vector3};
use crate::surfaces::Surface;

/// A surface the fluid collides against, carrying the surface's own
/// rigid-body motion (linear + angular velocity) and a friction
/// coefficient. Restitution is passed in per call from the solver's
/// `SphParameters` rather than stored here.
#[derive(Debug, Clone)]
pub struct RigidBodyCollider {
    pub surface: Surface,
    pub linear_velocity: Vector3,
    /// Scalar in 2D (rotation rate about +z), full vector in 3D.
    pub angular_velocity: Vector3,
    pub friction_coefficient: f32,
}

impl RigidBodyCollider {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            linear_velocity: Vector3::ZERO,
            angular_velocity: Vector3::ZERO,
            friction_coefficient: crate::config::DEFAULT_FRICTION,
        }
    }

    pub fn with_friction(mut self, friction_coefficient: f32) -> Self {
        self.friction_coefficient = friction_coefficient;
        self
    }

    pub fn with_linear_velocity(mut self, v: Vector3) -> Self {
        self.linear_velocity = v;
        self
    }

    pub fn with_angular_velocity(mut self, w: Vector3) -> Self {
        self.angular_velocity = w;
        self
    }

    fn surface_velocity_at(&self, position: Vector3) -> Vector3 {
        let r = position - self.surface.transform.translation();
        self.linear_velocity + self.angular_velocity.cross(r)
    }

    /// Advance the collider's own rigid-body motion over `dt`. The
    /// surfaces in this crate are static (plane/sphere/box at a fixed
    /// transform with prescribed velocity only), so there is nothing to
    /// integrate yet; kept as an explicit phase hook so the solver's Begin
    /// step has a single place to "tick" the collider.
    pub fn tick(&mut self, _dt: f32) {}

    /// Resolve penetration of a single particle against this collider's
    /// surface, in place.
    ///
    /// `dim` selects 2-D vs 3-D cross-product semantics for
    /// `surface_velocity_at` indirectly through the surface's own
    /// dimension-aware queries.
    pub fn resolve_collision(
        &self,
        dim: Dimension,
        radius: f32,
        restitution: f32,
        position: &mut Vector3,
        velocity: &mut Vector3,
    ) {
        let distance = self.surface.closest_distance(*position, dim);
        let point = self.surface.closest_point(*position, dim);
        let normal = self.surface.closest_normal(*position, dim);
        let surface_velocity = self.surface_velocity_at(*position);

        let penetrating = self.surface.is_inside(*position, dim) || distance < radius;
        if !penetrating {
            return;
        }

        let target = point + radius * normal;
        let relative_velocity = *velocity - surface_velocity;
        let normal_speed = normal.dot(relative_velocity);
        let v_n = normal * normal_speed;
        let v_t = relative_velocity - v_n;

        let new_velocity = if normal_speed < 0.0 {
            let v_n_reflected = -restitution * v_n;
            let v_t_scaled = if v_t.length() > 0.0 {
                let delta_v_n = (1.0 + restitution) * v_n;
                let scale = (1.0 - self.friction_coefficient * delta_v_n.length() / v_t.length()).max(0.0);
                v_t * scale
            } else {
                v_t
            };
            v_n_reflected + v_t_scaled + surface_velocity
        } else {
            relative_velocity + surface_velocity
        };

        *position = target;
        *velocity = new_velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::surfaces::{BoxShape, SurfaceKind};
    use crate::geometry::BoundingBox;
    use approx::assert_relative_eq;

    fn flipped_box_collider() -> RigidBodyCollider {
        let bounds = BoundingBox::new(Vector3::ZERO, Vector3::ONE).unwrap();
        let surface = Surface::new(
            Transform::identity(),
            SurfaceKind::Box(BoxShape::new(bounds, Dimension::Three).unwrap()),
        )
        .with_normal_flipped(true);
        RigidBodyCollider::new(surface)
    }

    #[test]
    fn non_penetrating_particle_is_untouched() {
        let collider = flipped_box_collider();
        let mut position = Vector3::new(0.5, 0.5, 0.5);
        let mut velocity = Vector3::new(0.1, 0.2, 0.3);
        let before_p = position;
        let before_v = velocity;
        collider.resolve_collision(Dimension::Three, 0.02, 0.0, &mut position, &mut velocity);
        assert_relative_eq!(position, before_p);
        assert_relative_eq!(velocity, before_v);
    }

    #[test]
    fn penetrating_particle_bounces_with_restitution() {
        let collider = flipped_box_collider();
        let radius = 0.02;
        let mut position = Vector3::new(0.5, -0.01, 0.5);
        let mut velocity = Vector3::new(0.0, -1.0, 0.0);
        collider.resolve_collision(Dimension::Three, radius, 0.5, &mut position, &mut velocity);
        assert!(velocity.y > 0.0, "expected an upward bounce, got {velocity:?}");
        assert_relative_eq!(position.y, radius, epsilon = 1e-5);
    }

    #[test]
    fn friction_damps_tangential_velocity() {
        let collider = flipped_box_collider().with_friction(1.0);
        let radius = 0.02;
        let mut position = Vector3::new(0.5, -0.01, 0.5);
        let mut velocity = Vector3::new(5.0, -1.0, 0.0);
        collider.resolve_collision(Dimension::Three, radius, 0.0, &mut position, &mut velocity);
        assert!(velocity.x.abs() < 5.0, "expected tangential velocity to be damped, got {velocity:?}");
    }
}
