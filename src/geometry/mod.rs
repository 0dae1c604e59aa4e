//! Geometric primitives shared by every other module.
//!
//! 2-D geometry is modeled as 3-D with `z == 0`, rather than carrying
//! parallel `Vector2`/`Vector3` types. [`glam::Vec3`] is re-exported as
//! `Vector3` so call sites read the way the rest of this crate's doc
//! comments describe them.

mod bounds;
mod transform;

pub use bounds::BoundingBox;
pub use transform::Transform;

/// A point or displacement in 2-D or 3-D space. 2-D geometry keeps `z == 0`.
pub type Vector3 = glam::Vec3;

/// Which spatial dimension a kernel, lattice generator, or bounding volume
/// is operating in. Threaded through as a value rather than a generic
/// parameter or duplicated type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    /// Number of spatial axes this dimension uses.
    pub fn axes(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}
