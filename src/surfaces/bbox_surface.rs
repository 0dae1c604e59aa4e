use crate::geometry::{BoundingBox, Dimension, Transform, Vector3};
use crate::error::{SphError, SphResult};

/// An axis-aligned box surface, in local space.
///
/// `closest_normal_local` is only ever queried for points on or near the
/// boundary by this crate's solver/collider. For a point strictly
/// outside, it resolves to the normal of whichever axis the clamp moved
/// furthest along, so the method is total rather than partial.
#[derive(Debug, Clone)]
pub struct BoxShape {
    pub bounds: BoundingBox,
    dim: Dimension,
}

impl BoxShape {
    pub fn new(bounds: BoundingBox, dim: Dimension) -> SphResult<Self> {
        if bounds.lower.x > bounds.upper.x
            || bounds.lower.y > bounds.upper.y
            || (dim == Dimension::Three && bounds.lower.z > bounds.upper.z)
        {
            return Err(SphError::DegenerateBox);
        }
        Ok(Self { bounds, dim })
    }

    fn axes(&self) -> &'static [usize] {
        match self.dim {
            Dimension::Two => &[0, 1],
            Dimension::Three => &[0, 1, 2],
        }
    }

    fn get(v: Vector3, axis: usize) -> f32 {
        match axis {
            0 => v.x,
            1 => v.y,
            _ => v.z,
        }
    }

    fn with(mut v: Vector3, axis: usize, value: f32) -> Vector3 {
        match axis {
            0 => v.x = value,
            1 => v.y = value,
            _ => v.z = value,
        }
        v
    }

    fn axis_unit(axis: usize) -> Vector3 {
        match axis {
            0 => Vector3::new(1.0, 0.0, 0.0),
            1 => Vector3::new(0.0, 1.0, 0.0),
            _ => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// Closest point among the box's `2 * dim` face planes, for a point
    /// already known to lie inside the box. Returns `(point, outward_normal)`.
    fn closest_face(&self, local: Vector3) -> (Vector3, Vector3) {
        let mut best_dist = f32::INFINITY;
        let mut best_point = local;
        let mut best_normal = Vector3::ZERO;
        for &axis in self.axes() {
            let v = Self::get(local, axis);
            let lo = Self::get(self.bounds.lower, axis);
            let hi = Self::get(self.bounds.upper, axis);
            let dist_lo = v - lo;
            let dist_hi = hi - v;
            if dist_lo < best_dist {
                best_dist = dist_lo;
                best_point = Self::with(local, axis, lo);
                best_normal = -Self::axis_unit(axis);
            }
            if dist_hi < best_dist {
                best_dist = dist_hi;
                best_point = Self::with(local, axis, hi);
                best_normal = Self::axis_unit(axis);
            }
        }
        (best_point, best_normal)
    }

    pub(crate) fn closest_point_local(&self, local: Vector3) -> Vector3 {
        if self.bounds.contains(local) {
            self.closest_face(local).0
        } else {
            self.bounds.clamp(local)
        }
    }

    pub(crate) fn closest_normal_local(&self, local: Vector3) -> Vector3 {
        if self.bounds.contains(local) {
            self.closest_face(local).1
        } else {
            // Outside: resolve to the normal of whichever axis the clamp
            // moved furthest along.
            let mut best_axis = self.axes()[0];
            let mut best_violation = 0.0f32;
            let mut sign = 1.0f32;
            for &axis in self.axes() {
                let v = Self::get(local, axis);
                let lo = Self::get(self.bounds.lower, axis);
                let hi = Self::get(self.bounds.upper, axis);
                let (violation, s) = if v < lo {
                    (lo - v, -1.0)
                } else if v > hi {
                    (v - hi, 1.0)
                } else {
                    (0.0, 0.0)
                };
                if violation > best_violation {
                    best_violation = violation;
                    best_axis = axis;
                    sign = s;
                }
            }
            if best_violation == 0.0 {
                // Exactly on the boundary along every axis already checked
                // by `contains`; fall back to the nearest face as if inside.
                self.closest_face(local).1
            } else {
                Self::axis_unit(best_axis) * sign
            }
        }
    }

    pub(crate) fn is_inside_local(&self, local: Vector3) -> bool {
        for &axis in self.axes() {
            let v = Self::get(local, axis);
            let lo = Self::get(self.bounds.lower, axis);
            let hi = Self::get(self.bounds.upper, axis);
            if v <= lo || v >= hi {
                return false;
            }
        }
        true
    }

    pub(crate) fn bounding_box_world(&self, transform: &Transform, dim: Dimension) -> BoundingBox {
        let corners = self.bounds.corners(dim);
        let mut it = corners.into_iter().map(|c| transform.to_world_point(c));
        let first = it.next().expect("box always has corners");
        it.fold(
            BoundingBox::new(first, first).expect("a single point is a valid box"),
            |acc, c| acc.merge(&BoundingBox::new(c, c).expect("a single point is a valid box")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoxShape {
        BoxShape::new(
            BoundingBox::new(Vector3::ZERO, Vector3::ONE).unwrap(),
            Dimension::Three,
        )
        .unwrap()
    }

    #[test]
    fn interior_point_snaps_to_nearest_face() {
        let b = unit_box();
        let (point, normal) = b.closest_face(Vector3::new(0.9, 0.5, 0.5));
        assert_relative_eq!(point, Vector3::new(1.0, 0.5, 0.5));
        assert_relative_eq!(normal, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn exterior_point_clamps_and_picks_max_violation_axis() {
        let b = unit_box();
        let outside = Vector3::new(5.0, 1.1, 0.5);
        let clamped = b.closest_point_local(outside);
        assert_relative_eq!(clamped, Vector3::new(1.0, 1.0, 0.5));
        let normal = b.closest_normal_local(outside);
        assert_relative_eq!(normal, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn two_dimensional_box_ignores_z_faces() {
        let b = BoxShape::new(
            BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)).unwrap(),
            Dimension::Two,
        )
        .unwrap();
        let (_, normal) = b.closest_face(Vector3::new(0.5, 0.9, 0.0));
        assert_relative_eq!(normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn is_inside_is_strict() {
        let b = unit_box();
        assert!(b.is_inside_local(Vector3::splat(0.5)));
        assert!(!b.is_inside_local(Vector3::new(1.0, 0.5, 0.5)));
        assert!(!b.is_inside_local(Vector3::new(2.0, 0.5, 0.5)));
    }
}
