use crate::geometry::{BoundingBox, Transform, Vector3};

/// A sphere, in local space, centered at the origin. World center comes
/// from the owning [`super::Surface`]'s transform translation.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub(crate) fn closest_normal_local(&self, local: Vector3) -> Vector3 {
        if local.length_squared() < crate::config::EPSILON * crate::config::EPSILON {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            local.normalize()
        }
    }

    pub(crate) fn closest_point_local(&self, local: Vector3) -> Vector3 {
        self.closest_normal_local(local) * self.radius
    }

    pub(crate) fn is_inside_local(&self, local: Vector3) -> bool {
        local.length_squared() < self.radius * self.radius
    }

    pub(crate) fn bounding_box_world(&self, transform: &Transform) -> BoundingBox {
        let c = transform.translation();
        let r = Vector3::splat(self.radius);
        BoundingBox::new(c - r, c + r).expect("sphere radius is non-negative")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closest_normal_at_center_falls_back_to_x_axis() {
        let s = Sphere::new(1.0);
        assert_relative_eq!(
            s.closest_normal_local(Vector3::ZERO),
            Vector3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn closest_point_scales_normal_by_radius() {
        let s = Sphere::new(2.0);
        let cp = s.closest_point_local(Vector3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(cp, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn inside_test_is_strict() {
        let s = Sphere::new(1.0);
        assert!(s.is_inside_local(Vector3::new(0.5, 0.0, 0.0)));
        assert!(!s.is_inside_local(Vector3::new(1.0, 0.0, 0.0)));
    }
}
