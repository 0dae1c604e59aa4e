use super::{Dimension, Vector3};
use crate::error::{SphError, SphResult};

/// Axis-aligned bounding box. 2-D users keep `lower.z == upper.z == 0.0`.
///
/// Invariant: `lower` is componentwise `<= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lower: Vector3,
    pub upper: Vector3,
}

impl BoundingBox {
    /// Construct a box, rejecting an inverted one.
    pub fn new(lower: Vector3, upper: Vector3) -> SphResult<Self> {
        if lower.x > upper.x || lower.y > upper.y || lower.z > upper.z {
            return Err(SphError::DegenerateBoundingBox);
        }
        Ok(Self { lower, upper })
    }

    /// Construct without validating; used internally where the caller has
    /// already established `lower <= upper` (e.g. after `merge`).
    fn new_unchecked(lower: Vector3, upper: Vector3) -> Self {
        Self { lower, upper }
    }

    pub fn width(&self) -> Vector3 {
        self.upper - self.lower
    }

    pub fn center(&self) -> Vector3 {
        (self.lower + self.upper) * 0.5
    }

    /// Grow (or shrink, for negative `delta`) the box symmetrically by
    /// `delta` on every axis: subtract from `lower`, add to `upper`.
    pub fn expand(&self, delta: f32) -> Self {
        let d = Vector3::splat(delta);
        Self::new_unchecked(self.lower - d, self.upper + d)
    }

    /// Componentwise union of two boxes.
    pub fn merge(&self, other: &BoundingBox) -> Self {
        Self::new_unchecked(self.lower.min(other.lower), self.upper.max(other.upper))
    }

    pub fn contains(&self, p: Vector3) -> bool {
        p.x >= self.lower.x
            && p.x <= self.upper.x
            && p.y >= self.lower.y
            && p.y <= self.upper.y
            && p.z >= self.lower.z
            && p.z <= self.upper.z
    }

    /// Componentwise clamp of `p` into the box.
    pub fn clamp(&self, p: Vector3) -> Vector3 {
        p.clamp(self.lower, self.upper)
    }

    /// The `2^axes` corners of the box, in x-major order: the lowest bit of
    /// `i` selects x (lower/upper), the next bit y, the next bit z.
    pub fn corner(&self, i: usize, dim: Dimension) -> Vector3 {
        let pick = |bit: usize, lo: f32, hi: f32| if i & (1 << bit) == 0 { lo } else { hi };
        let x = pick(0, self.lower.x, self.upper.x);
        let y = pick(1, self.lower.y, self.upper.y);
        let z = match dim {
            Dimension::Two => 0.0,
            Dimension::Three => pick(2, self.lower.z, self.upper.z),
        };
        Vector3::new(x, y, z)
    }

    /// All corners for the given dimension (4 in 2-D, 8 in 3-D).
    pub fn corners(&self, dim: Dimension) -> Vec<Vector3> {
        let n = 1usize << dim.axes();
        (0..n).map(|i| self.corner(i, dim)).collect()
    }

    /// Intersection of two boxes, or `None` if they don't overlap.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower.x > upper.x || lower.y > upper.y || lower.z > upper.z {
            None
        } else {
            Some(Self::new_unchecked(lower, upper))
        }
    }
}
