//! Implicit-surface primitives and their set composition.
//!
//! A closed, tagged-variant enum with virtual-call-free dispatch
//! (`SurfaceKind`) wrapped by a [`Surface`] that owns the shared
//! [`Transform`] and `is_normal_flipped` bit every variant needs. The
//! solver and collider depend only on [`Surface`]'s capability methods,
//! never on a variant directly.

mod bbox_surface;
mod plane;
mod set;
mod sphere;

pub use bbox_surface::BoxShape;
pub use plane::Plane;
pub use set::ImplicitSurfaceSet;
pub use sphere::Sphere;

use crate::geometry::{BoundingBox, Dimension, Transform, Vector3};

/// The closed set of surface primitives this crate supports: plane,
/// sphere, and axis-aligned box, plus their composition. Arbitrary mesh
/// colliders are out of scope.
#[derive(Debug, Clone)]
pub enum SurfaceKind {
    Plane(Plane),
    Sphere(Sphere),
    Box(BoxShape),
    Set(ImplicitSurfaceSet),
}

/// A transformed, optionally normal-flipped implicit surface.
///
/// Flipping inverts `is_inside` and negates `signed_distance`; this is how
/// a box that bounds the fluid domain is made to behave as an *inward*
/// facing container.
#[derive(Debug, Clone)]
pub struct Surface {
    pub transform: Transform,
    pub is_normal_flipped: bool,
    pub kind: SurfaceKind,
}

impl Surface {
    pub fn new(transform: Transform, kind: SurfaceKind) -> Self {
        Self {
            transform,
            is_normal_flipped: false,
            kind,
        }
    }

    pub fn with_normal_flipped(mut self, flipped: bool) -> Self {
        self.is_normal_flipped = flipped;
        self
    }

    fn flip_sign(&self) -> f32 {
        if self.is_normal_flipped {
            -1.0
        } else {
            1.0
        }
    }

    /// Closest point on the surface to `world_point`.
    pub fn closest_point(&self, world_point: Vector3, dim: Dimension) -> Vector3 {
        let local = self.transform.to_local_point(world_point);
        let closest_local = match &self.kind {
            SurfaceKind::Plane(p) => p.closest_point_local(local),
            SurfaceKind::Sphere(s) => s.closest_point_local(local),
            SurfaceKind::Box(b) => b.closest_point_local(local),
            SurfaceKind::Set(set) => {
                return set.closest_point(world_point, dim);
            }
        };
        self.transform.to_world_point(closest_local)
    }

    /// Outward unit normal at the point on the surface closest to `world_point`.
    pub fn closest_normal(&self, world_point: Vector3, dim: Dimension) -> Vector3 {
        let local = self.transform.to_local_point(world_point);
        let normal_local = match &self.kind {
            SurfaceKind::Plane(p) => p.closest_normal_local(local),
            SurfaceKind::Sphere(s) => s.closest_normal_local(local),
            SurfaceKind::Box(b) => b.closest_normal_local(local),
            SurfaceKind::Set(set) => {
                return set.closest_normal(world_point, dim);
            }
        };
        let world_normal = self.transform.to_world_direction(normal_local) * self.flip_sign();
        world_normal.normalize_or_zero()
    }

    /// Unsigned distance from `world_point` to the surface.
    pub fn closest_distance(&self, world_point: Vector3, dim: Dimension) -> f32 {
        if let SurfaceKind::Set(set) = &self.kind {
            return set.closest_distance(world_point, dim);
        }
        (world_point - self.closest_point(world_point, dim)).length()
    }

    /// True if `world_point` lies inside the surface (post normal-flip).
    pub fn is_inside(&self, world_point: Vector3, dim: Dimension) -> bool {
        if let SurfaceKind::Set(set) = &self.kind {
            let inside = set.is_inside(world_point, dim);
            return inside ^ self.is_normal_flipped;
        }
        let local = self.transform.to_local_point(world_point);
        let inside_local = match &self.kind {
            SurfaceKind::Plane(p) => p.is_inside_local(local),
            SurfaceKind::Sphere(s) => s.is_inside_local(local),
            SurfaceKind::Box(b) => b.is_inside_local(local),
            SurfaceKind::Set(_) => unreachable!(),
        };
        inside_local ^ self.is_normal_flipped
    }

    /// Signed distance: negative inside, positive outside, sign inverted by
    /// `is_normal_flipped`.
    pub fn signed_distance(&self, world_point: Vector3, dim: Dimension) -> f32 {
        if let SurfaceKind::Set(set) = &self.kind {
            let raw = set.signed_distance(world_point, dim);
            return raw * self.flip_sign();
        }
        let local = self.transform.to_local_point(world_point);
        let inside_local = match &self.kind {
            SurfaceKind::Plane(p) => p.is_inside_local(local),
            SurfaceKind::Sphere(s) => s.is_inside_local(local),
            SurfaceKind::Box(b) => b.is_inside_local(local),
            SurfaceKind::Set(_) => unreachable!(),
        };
        let distance = self.closest_distance(world_point, dim);
        let sign = if inside_local { -1.0 } else { 1.0 };
        sign * distance * self.flip_sign()
    }

    /// True if the surface occupies a finite region of space.
    pub fn is_bounded(&self) -> bool {
        match &self.kind {
            SurfaceKind::Plane(_) => false,
            SurfaceKind::Sphere(_) => true,
            SurfaceKind::Box(_) => true,
            SurfaceKind::Set(set) => set.is_bounded(),
        }
    }

    /// World-space bounding box, if this surface is bounded.
    pub fn bounding_box(&self, dim: Dimension) -> Option<BoundingBox> {
        match &self.kind {
            SurfaceKind::Plane(_) => None,
            SurfaceKind::Sphere(s) => Some(s.bounding_box_world(&self.transform)),
            SurfaceKind::Box(b) => Some(b.bounding_box_world(&self.transform, dim)),
            SurfaceKind::Set(set) => set.bounding_box(dim),
        }
    }
}
