use super::Surface;
use crate::geometry::{BoundingBox, Dimension, Vector3};

/// An ordered collection of surfaces whose signed distance is the minimum
/// of its children's. Adding the same surface twice is semantically
/// idempotent: the extra copy can only ever tie the `min`, never change
/// it.
#[derive(Debug, Clone, Default)]
pub struct ImplicitSurfaceSet {
    surfaces: Vec<Surface>,
}

impl ImplicitSurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, surface: Surface) -> &mut Self {
        self.surfaces.push(surface);
        self
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// World-space translation of the first surface added, or the origin
    /// if the set is empty. Used as a representative pivot by callers
    /// that need one reference point for a set of surfaces, such as the
    /// emitter's rotation origin.
    pub fn translation(&self) -> Vector3 {
        self.surfaces
            .first()
            .map(|s| s.transform.translation())
            .unwrap_or(Vector3::ZERO)
    }

    pub fn signed_distance(&self, world_point: Vector3, dim: Dimension) -> f32 {
        self.surfaces
            .iter()
            .map(|s| s.signed_distance(world_point, dim))
            .fold(f32::INFINITY, f32::min)
    }

    pub fn closest_distance(&self, world_point: Vector3, dim: Dimension) -> f32 {
        self.surfaces
            .iter()
            .map(|s| s.closest_distance(world_point, dim))
            .fold(f32::INFINITY, f32::min)
    }

    pub fn closest_point(&self, world_point: Vector3, dim: Dimension) -> Vector3 {
        self.surfaces
            .iter()
            .min_by(|a, b| {
                a.closest_distance(world_point, dim)
                    .partial_cmp(&b.closest_distance(world_point, dim))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.closest_point(world_point, dim))
            .unwrap_or(world_point)
    }

    pub fn closest_normal(&self, world_point: Vector3, dim: Dimension) -> Vector3 {
        self.surfaces
            .iter()
            .min_by(|a, b| {
                a.closest_distance(world_point, dim)
                    .partial_cmp(&b.closest_distance(world_point, dim))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.closest_normal(world_point, dim))
            .unwrap_or(Vector3::new(1.0, 0.0, 0.0))
    }

    pub fn is_inside(&self, world_point: Vector3, dim: Dimension) -> bool {
        self.surfaces.iter().any(|s| s.is_inside(world_point, dim))
    }

    /// Bounded iff non-empty and every child is bounded.
    pub fn is_bounded(&self) -> bool {
        !self.surfaces.is_empty() && self.surfaces.iter().all(|s| s.is_bounded())
    }

    pub fn bounding_box(&self, dim: Dimension) -> Option<BoundingBox> {
        if !self.is_bounded() {
            return None;
        }
        self.surfaces
            .iter()
            .filter_map(|s| s.bounding_box(dim))
            .reduce(|a, b| a.merge(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::surfaces::{Sphere, SurfaceKind};
    use approx::assert_relative_eq;

    fn sphere_at(center: Vector3, r: f32) -> Surface {
        Surface::new(
            Transform::from_translation(center),
            SurfaceKind::Sphere(Sphere::new(r)),
        )
    }

    #[test]
    fn signed_distance_is_min_of_children() {
        let mut set = ImplicitSurfaceSet::new();
        set.add(sphere_at(Vector3::ZERO, 1.0));
        set.add(sphere_at(Vector3::new(10.0, 0.0, 0.0), 1.0));

        let p = Vector3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(set.signed_distance(p, Dimension::Three), -1.0, epsilon = 1e-5);
    }

    #[test]
    fn adding_duplicate_surface_does_not_change_signed_distance() {
        let mut set = ImplicitSurfaceSet::new();
        set.add(sphere_at(Vector3::ZERO, 1.0));
        let before = set.signed_distance(Vector3::new(2.0, 0.0, 0.0), Dimension::Three);
        set.add(sphere_at(Vector3::ZERO, 1.0));
        let after = set.signed_distance(Vector3::new(2.0, 0.0, 0.0), Dimension::Three);
        assert_relative_eq!(before, after, epsilon = 1e-6);
    }

    #[test]
    fn bounded_iff_nonempty_and_all_children_bounded() {
        let empty = ImplicitSurfaceSet::new();
        assert!(!empty.is_bounded());

        let mut set = ImplicitSurfaceSet::new();
        set.add(sphere_at(Vector3::ZERO, 1.0));
        assert!(set.is_bounded());

        let mut with_plane = ImplicitSurfaceSet::new();
        with_plane.add(Surface::new(
            Transform::identity(),
            SurfaceKind::Plane(super::super::Plane::new(Vector3::new(0.0, 1.0, 0.0))),
        ));
        assert!(!with_plane.is_bounded());
    }
}
