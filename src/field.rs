//! Vector fields sampled by the solver as external forces, such as the
//! wind term used by drag. Reduced to the pure sampling contract the
//! solver needs.

use crate::geometry::Vector3;

/// A vector field sampled at arbitrary world points.
pub trait VectorField: Send + Sync {
    fn sample(&self, position: Vector3) -> Vector3;
}

/// A spatially uniform field, e.g. constant wind.
#[derive(Debug, Clone, Copy)]
pub struct ConstantVectorField {
    pub value: Vector3,
}

impl ConstantVectorField {
    pub fn new(value: Vector3) -> Self {
        Self { value }
    }
}

impl VectorField for ConstantVectorField {
    fn sample(&self, _position: Vector3) -> Vector3 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_field_ignores_position() {
        let wind = ConstantVectorField::new(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(wind.sample(Vector3::ZERO), wind.value);
        assert_eq!(wind.sample(Vector3::splat(100.0)), wind.value);
    }
}
