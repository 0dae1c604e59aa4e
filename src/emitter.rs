//! Volumetric particle emitter: samples new particles from the interior
//! of an implicit surface at a target lattice spacing.

use crate::error::{SphError, SphResult};
use crate::geometry::{BoundingBox, Dimension, Vector3};
use crate::particles::ParticleStore;
use crate::rng::RandomSource;
use crate::point_generator::{BccLatticePointGenerator, TrianglePointGenerator};
use crate::surfaces::ImplicitSurfaceSet;
use std::f32::consts::TAU;

/// Samples particles inside an [`ImplicitSurfaceSet`], clipped to a
/// bounding region, on a deterministic lattice with jitter.
#[derive(Debug, Clone)]
pub struct VolumeParticleEmitter {
    surface_set: ImplicitSurfaceSet,
    bounding_region: BoundingBox,
    spacing: f32,
    initial_velocity: Vector3,
    linear_velocity: Vector3,
    /// Scalar in 2D (read via `.z`), full vector in 3D — same convention as
    /// [`crate::collider::RigidBodyCollider::angular_velocity`].
    angular_velocity: Vector3,
    rotation_origin: Vector3,
    jitter: f32,
    is_one_shot: bool,
    max_number_of_particles: usize,
    number_of_emitted_particles: usize,
    is_enabled: bool,
    /// Default seed used when the solver does not supply its own RNG.
    seed: u64,
    /// Stored but not consulted by the sampling algorithm; reserved for a
    /// future acceptance-test relaxation that allows newly emitted
    /// particles to overlap existing ones.
    allow_overlapping: bool,
}

impl VolumeParticleEmitter {
    pub fn new(surface_set: ImplicitSurfaceSet, bounding_region: BoundingBox, spacing: f32) -> SphResult<Self> {
        if surface_set.is_empty() {
            return Err(SphError::EmptySurfaceSet);
        }
        // The rotation pivot anchors to the source surface's own translation,
        // not the (unrelated) clipping region's center. `ImplicitSurfaceSet`
        // may hold more than one surface, so this takes the first one added
        // as representative, matching the common case of a single source
        // surface with an incidental bounding box attached.
        let rotation_origin = surface_set.translation();
        Ok(Self {
            surface_set,
            bounding_region,
            spacing,
            initial_velocity: Vector3::ZERO,
            linear_velocity: Vector3::ZERO,
            angular_velocity: Vector3::ZERO,
            rotation_origin,
            jitter: 0.0,
            is_one_shot: true,
            max_number_of_particles: usize::MAX,
            number_of_emitted_particles: 0,
            is_enabled: true,
            seed: 0,
            allow_overlapping: false,
        })
    }

    pub fn with_initial_velocity(mut self, v: Vector3) -> Self {
        self.initial_velocity = v;
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

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    pub fn with_one_shot(mut self, one_shot: bool) -> Self {
        self.is_one_shot = one_shot;
        self
    }

    pub fn with_max_number_of_particles(mut self, max: usize) -> Self {
        self.max_number_of_particles = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_allow_overlapping(mut self, allow: bool) -> Self {
        self.allow_overlapping = allow;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn allow_overlapping(&self) -> bool {
        self.allow_overlapping
    }

    pub fn number_of_emitted_particles(&self) -> usize {
        self.number_of_emitted_particles
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    fn sample_direction(dim: Dimension, rng: &mut impl RandomSource) -> Vector3 {
        match dim {
            Dimension::Two => {
                let angle = rng.next_unit() * TAU;
                Vector3::new(angle.cos(), angle.sin(), 0.0)
            }
            Dimension::Three => {
                let (u1, u2) = rng.next_unit_pair();
                let y = 1.0 - 2.0 * u1;
                let r = (1.0 - y * y).max(0.0).sqrt();
                let phi = TAU * u2;
                Vector3::new(r * phi.cos(), y, r * phi.sin())
            }
        }
    }

    fn velocity_at(&self, p: Vector3, dim: Dimension) -> Vector3 {
        let r = p - self.rotation_origin;
        let angular = match dim {
            Dimension::Two => Vector3::new(-self.angular_velocity.z * r.y, self.angular_velocity.z * r.x, 0.0),
            Dimension::Three => self.angular_velocity.cross(r),
        };
        self.initial_velocity + self.linear_velocity + angular
    }

    /// Sample and append one batch of particles. A no-op if the emitter
    /// is disabled.
    pub fn update(&mut self, dim: Dimension, target: &mut ParticleStore, rng: &mut impl RandomSource) {
        if !self.is_enabled {
            return;
        }

        let region = match self.surface_set.bounding_box(dim) {
            Some(surface_bounds) => self.bounding_region.intersect(&surface_bounds).unwrap_or(self.bounding_region),
            None => self.bounding_region,
        };

        let candidates = match dim {
            Dimension::Two => TrianglePointGenerator::generate(&region, self.spacing),
            Dimension::Three => BccLatticePointGenerator::generate(&region, self.spacing),
        };

        let mut accepted = Vec::new();
        let mut emitted = self.number_of_emitted_particles;
        for candidate in candidates {
            if emitted >= self.max_number_of_particles {
                break;
            }
            let dir = Self::sample_direction(dim, rng);
            let offset = dir * (0.5 * self.jitter * self.spacing);
            let jittered = candidate + offset;
            if self.surface_set.signed_distance(jittered, dim) <= 0.0 {
                accepted.push(jittered);
                emitted += 1;
            }
        }

        if accepted.is_empty() {
            return;
        }

        let velocities: Vec<Vector3> = accepted.iter().map(|&p| self.velocity_at(p, dim)).collect();
        target.add_particles(&accepted, &velocities, &[]);
        self.number_of_emitted_particles = emitted;

        if self.is_one_shot {
            self.is_enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::rng::ChaChaRandomSource;
    use crate::surfaces::{Plane, Sphere, Surface, SurfaceKind};

    fn water_drop_source() -> ImplicitSurfaceSet {
        let mut set = ImplicitSurfaceSet::new();
        set.add(Surface::new(
            Transform::identity(),
            SurfaceKind::Plane(Plane::new(Vector3::new(0.0, 1.0, 0.0))),
        ));
        set.add(Surface::new(
            Transform::from_translation(Vector3::new(0.5, 1.0, 0.5)),
            SurfaceKind::Sphere(Sphere::new(0.15)),
        ));
        set
    }

    #[test]
    fn rejects_an_empty_surface_set() {
        let bounds = BoundingBox::new(Vector3::ZERO, Vector3::new(1.0, 2.0, 1.0)).unwrap();
        let err = VolumeParticleEmitter::new(ImplicitSurfaceSet::new(), bounds, 0.02).unwrap_err();
        assert!(matches!(err, SphError::EmptySurfaceSet));
    }

    /// Capacity truncation stops the emitter at exactly the configured
    /// maximum and disables a one-shot emitter after firing.
    #[test]
    fn one_shot_emitter_truncates_at_capacity_and_disables() {
        let bounds = BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 1.0)).unwrap();
        let mut emitter = VolumeParticleEmitter::new(water_drop_source(), bounds, 0.02)
            .unwrap()
            .with_max_number_of_particles(500)
            .with_one_shot(true);

        let mut store = ParticleStore::new(0.02, 1.0);
        let mut rng = ChaChaRandomSource::new(7);
        emitter.update(Dimension::Three, &mut store, &mut rng);

        assert_eq!(store.len(), 500);
        assert_eq!(emitter.number_of_emitted_particles(), 500);
        assert!(!emitter.is_enabled());

        // A second call must be a no-op: disabled one-shot emitters never emit again.
        emitter.update(Dimension::Three, &mut store, &mut rng);
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn emitted_particles_satisfy_signed_distance_acceptance() {
        let bounds = BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 1.0)).unwrap();
        let source = water_drop_source();
        let mut emitter =
            VolumeParticleEmitter::new(source.clone(), bounds, 0.05).unwrap().with_max_number_of_particles(50);
        let mut store = ParticleStore::new(0.05, 1.0);
        let mut rng = ChaChaRandomSource::new(1);
        emitter.update(Dimension::Three, &mut store, &mut rng);
        assert!(!store.is_empty());
        for &p in store.positions() {
            assert!(source.signed_distance(p, Dimension::Three) <= 1e-4);
        }
    }

    #[test]
    fn is_deterministic_given_a_seeded_rng() {
        let bounds = BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 1.0)).unwrap();
        let mut store_a = ParticleStore::new(0.05, 1.0);
        let mut store_b = ParticleStore::new(0.05, 1.0);
        let mut emitter_a =
            VolumeParticleEmitter::new(water_drop_source(), bounds, 0.05).unwrap().with_max_number_of_particles(80);
        let mut emitter_b = emitter_a.clone();
        let mut rng_a = ChaChaRandomSource::new(99);
        let mut rng_b = ChaChaRandomSource::new(99);
        emitter_a.update(Dimension::Three, &mut store_a, &mut rng_a);
        emitter_b.update(Dimension::Three, &mut store_b, &mut rng_b);
        assert_eq!(store_a.positions(), store_b.positions());
    }
}
