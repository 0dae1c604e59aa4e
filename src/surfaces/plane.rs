use crate::geometry::Vector3;

/// An infinite plane, in local space, passing through the origin with the
/// given unit normal. World position/orientation comes from the owning
/// [`super::Surface`]'s transform, so the plane's reference point is
/// exactly the transform's translation.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vector3,
}

impl Plane {
    pub fn new(normal: Vector3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
        }
    }

    pub(crate) fn closest_point_local(&self, local: Vector3) -> Vector3 {
        local - self.normal * local.dot(self.normal)
    }

    pub(crate) fn closest_normal_local(&self, _local: Vector3) -> Vector3 {
        self.normal
    }

    pub(crate) fn is_inside_local(&self, local: Vector3) -> bool {
        local.dot(self.normal) < 0.0
    }
}
