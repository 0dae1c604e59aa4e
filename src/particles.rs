//! The particle store and its SPH-specialized extension.
//!
//! Structure-of-arrays throughout: every attribute is one flat `Vec`
//! indexed by particle id, rather than a `Vec` of owned per-particle
//! structs, for cache locality over a large, tight per-frame loop.

use crate::error::{SphError, SphResult};
use crate::geometry::{BoundingBox, Dimension, Vector3};
use crate::kernels::StdKernel;
use crate::point_generator::{BccLatticePointGenerator, TrianglePointGenerator};
use std::ops::{Deref, DerefMut};

/// A structure-of-arrays particle store: fixed `radius`/`mass`, intrinsic
/// position/velocity/force arrays, and any number of named scalar/vector
/// attribute columns, all co-indexed by particle id.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    radius: f32,
    mass: f32,
    n: usize,
    positions: Vec<Vector3>,
    velocities: Vec<Vector3>,
    forces: Vec<Vector3>,
    scalar_attributes: Vec<Vec<f32>>,
    vector_attributes: Vec<Vec<Vector3>>,
}

impl ParticleStore {
    pub fn new(radius: f32, mass: f32) -> Self {
        Self {
            radius,
            mass,
            n: 0,
            positions: Vec::new(),
            velocities: Vec::new(),
            forces: Vec::new(),
            scalar_attributes: Vec::new(),
            vector_attributes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vector3] {
        &mut self.positions
    }

    pub fn velocities(&self) -> &[Vector3] {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut [Vector3] {
        &mut self.velocities
    }

    pub fn forces(&self) -> &[Vector3] {
        &self.forces
    }

    pub fn forces_mut(&mut self) -> &mut [Vector3] {
        &mut self.forces
    }

    pub fn clear_forces(&mut self) {
        self.forces.iter_mut().for_each(|f| *f = Vector3::ZERO);
    }

    /// Register a new scalar attribute column, zero-initialized for every
    /// existing particle. Returns a stable index for later access.
    pub fn add_scalar_data(&mut self, initial: f32) -> usize {
        self.scalar_attributes.push(vec![initial; self.n]);
        self.scalar_attributes.len() - 1
    }

    /// Register a new vector attribute column, zero-initialized for every
    /// existing particle. Returns a stable index for later access.
    pub fn add_vector_data(&mut self, initial: Vector3) -> usize {
        self.vector_attributes.push(vec![initial; self.n]);
        self.vector_attributes.len() - 1
    }

    pub fn scalar_data(&self, idx: usize) -> &[f32] {
        &self.scalar_attributes[idx]
    }

    pub fn scalar_data_mut(&mut self, idx: usize) -> &mut [f32] {
        &mut self.scalar_attributes[idx]
    }

    pub fn vector_data(&self, idx: usize) -> &[Vector3] {
        &self.vector_attributes[idx]
    }

    pub fn vector_data_mut(&mut self, idx: usize) -> &mut [Vector3] {
        &mut self.vector_attributes[idx]
    }

    /// Grow every attribute array to length `n`, filling new slots with
    /// zero. Never shrinks — a no-op if `n <= len()`.
    pub fn resize(&mut self, n: usize) {
        if n <= self.n {
            return;
        }
        self.positions.resize(n, Vector3::ZERO);
        self.velocities.resize(n, Vector3::ZERO);
        self.forces.resize(n, Vector3::ZERO);
        for arr in &mut self.scalar_attributes {
            arr.resize(n, 0.0);
        }
        for arr in &mut self.vector_attributes {
            arr.resize(n, Vector3::ZERO);
        }
        self.n = n;
    }

    /// Append particles, growing every attribute array. Empty
    /// `velocities`/`forces` slices contribute zero vectors for the
    /// appended particles.
    pub fn add_particles(&mut self, positions: &[Vector3], velocities: &[Vector3], forces: &[Vector3]) {
        let added = positions.len();
        if added == 0 {
            return;
        }
        self.positions.extend_from_slice(positions);
        if velocities.is_empty() {
            self.velocities.extend(std::iter::repeat(Vector3::ZERO).take(added));
        } else {
            debug_assert_eq!(velocities.len(), added);
            self.velocities.extend_from_slice(velocities);
        }
        if forces.is_empty() {
            self.forces.extend(std::iter::repeat(Vector3::ZERO).take(added));
        } else {
            debug_assert_eq!(forces.len(), added);
            self.forces.extend_from_slice(forces);
        }
        self.n += added;
        for arr in &mut self.scalar_attributes {
            arr.resize(self.n, 0.0);
        }
        for arr in &mut self.vector_attributes {
            arr.resize(self.n, Vector3::ZERO);
        }
    }
}

/// SPH-specialized particle store: a [`ParticleStore`] plus the density
/// targets that determine particle mass and kernel radius, and two
/// registered scalar attributes (density, pressure).
///
/// Composition, not inheritance: the inner particle store is reached
/// through a `Deref`/`DerefMut` impl rather than a base/derived class
/// hierarchy.
#[derive(Debug, Clone)]
pub struct SphSystemData {
    store: ParticleStore,
    target_density: f32,
    target_spacing: f32,
    kernel_radius_over_target_spacing: f32,
    kernel_radius: f32,
    dim: Dimension,
    density_idx: usize,
    pressure_idx: usize,
}

impl Deref for SphSystemData {
    type Target = ParticleStore;
    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for SphSystemData {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

impl SphSystemData {
    pub fn new(dim: Dimension, target_density: f32, target_spacing: f32) -> SphResult<Self> {
        Self::with_kernel_ratio(
            dim,
            target_density,
            target_spacing,
            crate::config::DEFAULT_KERNEL_RADIUS_OVER_SPACING,
        )
    }

    pub fn with_kernel_ratio(
        dim: Dimension,
        target_density: f32,
        target_spacing: f32,
        kernel_radius_over_target_spacing: f32,
    ) -> SphResult<Self> {
        if target_spacing <= 0.0 {
            return Err(SphError::NonPositiveSpacing(target_spacing));
        }
        if kernel_radius_over_target_spacing < 1.0 {
            return Err(SphError::InvalidKernelRatio(kernel_radius_over_target_spacing));
        }
        let kernel_radius = target_spacing * kernel_radius_over_target_spacing;
        let mass = compute_mass(dim, target_spacing, target_density, kernel_radius);
        let mut store = ParticleStore::new(target_spacing, mass);
        let density_idx = store.add_scalar_data(0.0);
        let pressure_idx = store.add_scalar_data(0.0);
        Ok(Self {
            store,
            target_density,
            target_spacing,
            kernel_radius_over_target_spacing,
            kernel_radius,
            dim,
            density_idx,
            pressure_idx,
        })
    }

    pub fn target_density(&self) -> f32 {
        self.target_density
    }

    pub fn target_spacing(&self) -> f32 {
        self.target_spacing
    }

    pub fn kernel_radius(&self) -> f32 {
        self.kernel_radius
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn density(&self) -> &[f32] {
        self.store.scalar_data(self.density_idx)
    }

    pub fn density_mut(&mut self) -> &mut [f32] {
        self.store.scalar_data_mut(self.density_idx)
    }

    pub fn pressure(&self) -> &[f32] {
        self.store.scalar_data(self.pressure_idx)
    }

    pub fn pressure_mut(&mut self) -> &mut [f32] {
        self.store.scalar_data_mut(self.pressure_idx)
    }

    /// Re-derive `target_spacing`, `radius`, `kernel_radius`, and `mass`.
    /// Mass is invariant to the new spacing in the sense that
    /// `mass() * max_number_density(spacing) == target_density` exactly.
    pub fn set_target_spacing(&mut self, target_spacing: f32) -> SphResult<()> {
        if target_spacing <= 0.0 {
            return Err(SphError::NonPositiveSpacing(target_spacing));
        }
        self.target_spacing = target_spacing;
        self.kernel_radius = target_spacing * self.kernel_radius_over_target_spacing;
        self.store.set_radius(target_spacing);
        self.store.set_mass(compute_mass(
            self.dim,
            self.target_spacing,
            self.target_density,
            self.kernel_radius,
        ));
        Ok(())
    }

    pub fn set_target_density(&mut self, target_density: f32) {
        self.target_density = target_density;
        self.store.set_mass(compute_mass(
            self.dim,
            self.target_spacing,
            self.target_density,
            self.kernel_radius,
        ));
    }
}

/// Sample points on a reference lattice inside a box of half-side
/// `1.5 * kernel_radius`, sum the standard kernel over every pair, and take
/// the maximum per-point sum as the number density used to derive mass.
pub fn max_number_density(dim: Dimension, target_spacing: f32, kernel_radius: f32) -> f32 {
    let half_side = 1.5 * kernel_radius;
    let lower = match dim {
        Dimension::Two => Vector3::new(-half_side, -half_side, 0.0),
        Dimension::Three => Vector3::splat(-half_side),
    };
    let upper = match dim {
        Dimension::Two => Vector3::new(half_side, half_side, 0.0),
        Dimension::Three => Vector3::splat(half_side),
    };
    let bounds = BoundingBox::new(lower, upper).expect("half_side is non-negative");
    let points = match dim {
        Dimension::Two => TrianglePointGenerator::generate(&bounds, target_spacing),
        Dimension::Three => BccLatticePointGenerator::generate(&bounds, target_spacing),
    };
    let kernel = StdKernel::new(kernel_radius, dim);
    points
        .iter()
        .map(|pi| points.iter().map(|pj| kernel.value((*pi - *pj).length())).sum::<f32>())
        .fold(0.0f32, f32::max)
}

fn compute_mass(dim: Dimension, target_spacing: f32, target_density: f32, kernel_radius: f32) -> f32 {
    let density = max_number_density(dim, target_spacing, kernel_radius);
    target_density / density
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn add_particles_grows_all_arrays_together() {
        let mut store = ParticleStore::new(0.1, 1.0);
        let idx = store.add_scalar_data(0.0);
        store.add_particles(
            &[Vector3::ZERO, Vector3::ONE],
            &[Vector3::new(1.0, 0.0, 0.0)],
            &[],
        );
        // velocities slice had wrong length vs positions in a real caller
        // this would be a debug_assert failure; exercise the "empty" path
        // for forces and the "populated but shorter than added" invariant
        // separately below.
        assert_eq!(store.len(), 2);
        assert_eq!(store.scalar_data(idx).len(), 2);
    }

    #[test]
    fn missing_velocity_and_force_default_to_zero() {
        let mut store = ParticleStore::new(0.1, 1.0);
        store.add_particles(&[Vector3::ZERO, Vector3::ONE], &[], &[]);
        assert_eq!(store.velocities(), &[Vector3::ZERO, Vector3::ZERO]);
        assert_eq!(store.forces(), &[Vector3::ZERO, Vector3::ZERO]);
    }

    #[test]
    fn resize_never_shrinks() {
        let mut store = ParticleStore::new(0.1, 1.0);
        store.add_particles(&[Vector3::ZERO; 5], &[], &[]);
        store.resize(2);
        assert_eq!(store.len(), 5);
        store.resize(8);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn radius_equals_target_spacing() {
        let data = SphSystemData::new(Dimension::Three, 1000.0, 0.02).unwrap();
        assert_relative_eq!(data.radius(), data.target_spacing());
    }

    #[test]
    fn mass_times_max_number_density_equals_target_density() {
        let dim = Dimension::Three;
        let spacing = 0.05;
        let density = 1000.0;
        let data = SphSystemData::new(dim, density, spacing).unwrap();
        let max_density = max_number_density(dim, spacing, data.kernel_radius());
        assert_relative_eq!(data.mass() * max_density, density, epsilon = 1e-3);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        assert!(SphSystemData::new(Dimension::Three, 1000.0, 0.0).is_err());
        assert!(SphSystemData::new(Dimension::Three, 1000.0, -1.0).is_err());
    }

    #[test]
    fn rejects_kernel_ratio_below_one() {
        assert!(SphSystemData::with_kernel_ratio(Dimension::Three, 1000.0, 0.02, 0.5).is_err());
    }
}
