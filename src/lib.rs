//! Smoothed-particle hydrodynamics fluid solver.
//!
//! A Lagrangian fluid simulation over a particle set under gravity,
//! viscosity, pressure, wind drag, and rigid-body collision. The solver
//! ([`solver::SphSolver`]) owns a [`particles::SphSystemData`], rebuilds a
//! [`neighbor_search::PointHashGridSearcher`] every sub-step, and advances
//! particle state with adaptive sub-stepping and symplectic-Euler
//! integration.
//!
//! Everything outside the solver's direct dependency graph — the
//! animation loop, file output, a viewer — is an external collaborator
//! reached only through [`solver::FrameSink`] and [`rng::RandomSource`].

pub mod collider;
pub mod config;
pub mod emitter;
pub mod error;
pub mod field;
pub mod geometry;
pub mod kernels;
pub mod neighbor_search;
pub mod particles;
pub mod point_generator;
pub mod rng;
pub mod solver;
pub mod surfaces;

pub use collider::RigidBodyCollider;
pub use emitter::VolumeParticleEmitter;
pub use error::{SphError, SphResult};
pub use field::{ConstantVectorField, VectorField};
pub use geometry::{BoundingBox, Dimension, Transform, Vector3};
pub use kernels::{SpikyKernel, StdKernel};
pub use neighbor_search::PointHashGridSearcher;
pub use particles::{ParticleStore, SphSystemData};
pub use rng::{ChaChaRandomSource, RandomSource};
pub use solver::{Frame, FrameSink, SphParameters, SphSolver};
pub use surfaces::{BoxShape, ImplicitSurfaceSet, Plane, Sphere, Surface, SurfaceKind};
