//! The SPH solver: adaptive sub-stepping, force accumulation, integration,
//! collision, and pseudo-viscosity smoothing.

use crate::collider::RigidBodyCollider;
use crate::config::{
    DEFAULT_EOS_EXPONENT, DEFAULT_NEGATIVE_PRESSURE_SCALE, DEFAULT_RESTITUTION,
    DEFAULT_SPEED_OF_SOUND, DEFAULT_TIME_STEP_LIMIT_SCALE, EPSILON, MIN_GRID_RESOLUTION,
    TIME_STEP_FORCE_FACTOR, TIME_STEP_SPEED_FACTOR,
};
use crate::emitter::VolumeParticleEmitter;
use crate::error::SphResult;
use crate::field::{ConstantVectorField, VectorField};
use crate::geometry::{Dimension, Vector3};
use crate::kernels::{SpikyKernel, StdKernel};
use crate::neighbor_search::PointHashGridSearcher;
use crate::particles::SphSystemData;
use crate::rng::RandomSource;
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single frame request from the animation loop: an index and a
/// wall-clock duration to advance by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub time_interval_in_seconds: f32,
}

impl Frame {
    pub fn new(index: u64, time_interval_in_seconds: f32) -> Self {
        Self {
            index,
            time_interval_in_seconds,
        }
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }
}

/// Tunable physical and numerical parameters of the solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SphParameters {
    pub eos_exponent: f32,
    pub negative_pressure_scale: f32,
    pub viscosity_coefficient: f32,
    pub pseudo_viscosity_coefficient: f32,
    pub speed_of_sound: f32,
    pub time_step_limit_scale: f32,
    pub gravity: Vector3,
    pub drag_coefficient: f32,
    pub restitution_coefficient: f32,
}

impl Default for SphParameters {
    fn default() -> Self {
        Self {
            eos_exponent: DEFAULT_EOS_EXPONENT,
            negative_pressure_scale: DEFAULT_NEGATIVE_PRESSURE_SCALE,
            viscosity_coefficient: 0.0,
            pseudo_viscosity_coefficient: 0.0,
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            time_step_limit_scale: DEFAULT_TIME_STEP_LIMIT_SCALE,
            gravity: Vector3::new(0.0, -9.8, 0.0),
            drag_coefficient: 0.0,
            restitution_coefficient: DEFAULT_RESTITUTION,
        }
    }
}

/// A collider surface line, for an (external) viewer. Read-only; does not
/// affect solver state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vector3,
    pub end: Vector3,
}

/// Optional, disabled-by-default side channel a viewer can use to draw
/// collider wireframes and neighbor-grid occupancy without the solver
/// taking a dependency on any rendering crate.
#[derive(Debug, Clone, Default)]
pub struct SolverDebugView {
    pub collider_lines: Vec<DebugLine>,
    pub occupied_buckets: usize,
}

/// External sink for per-frame particle positions. A driver implements
/// this to dump numeric arrays, push vertices to a renderer, etc.; the
/// solver never performs file or graphics I/O itself.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &Frame, positions: &[Vector3]);
}

/// The SPH fluid solver.
pub struct SphSolver {
    dim: Dimension,
    data: SphSystemData,
    wind: ConstantVectorField,
    emitter: Option<VolumeParticleEmitter>,
    collider: Option<RigidBodyCollider>,
    params: SphParameters,
    scratch_positions: Vec<Vector3>,
    scratch_velocities: Vec<Vector3>,
    neighbor_lists: Vec<Vec<usize>>,
    current_frame: Option<Frame>,
    max_force_magnitude: f32,
    max_density: f32,
    #[cfg(feature = "debug-render")]
    debug_enabled: bool,
    #[cfg(feature = "debug-render")]
    debug_view: Option<SolverDebugView>,
}

impl SphSolver {
    pub fn new(dim: Dimension, target_density: f32, target_spacing: f32) -> SphResult<Self> {
        let data = SphSystemData::new(dim, target_density, target_spacing)?;
        Ok(Self {
            dim,
            data,
            wind: ConstantVectorField::new(Vector3::ZERO),
            emitter: None,
            collider: None,
            params: SphParameters::default(),
            scratch_positions: Vec::new(),
            scratch_velocities: Vec::new(),
            neighbor_lists: Vec::new(),
            current_frame: None,
            max_force_magnitude: 0.0,
            max_density: 0.0,
            #[cfg(feature = "debug-render")]
            debug_enabled: false,
            #[cfg(feature = "debug-render")]
            debug_view: None,
        })
    }

    pub fn with_params(mut self, params: SphParameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_wind(mut self, wind: ConstantVectorField) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_emitter(mut self, emitter: VolumeParticleEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn with_collider(mut self, collider: RigidBodyCollider) -> Self {
        self.collider = Some(collider);
        self
    }

    #[cfg(feature = "debug-render")]
    pub fn enable_debug_view(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    pub fn data(&self) -> &SphSystemData {
        &self.data
    }

    /// Seed particles directly, bypassing the emitter. Used by a driver
    /// that wants to place an initial configuration (or by tests) rather
    /// than sampling one from an implicit surface.
    pub fn add_particles(&mut self, positions: &[Vector3], velocities: &[Vector3]) {
        self.data.add_particles(positions, velocities, &[]);
    }

    pub fn max_density(&self) -> f32 {
        self.max_density
    }

    #[cfg(feature = "debug-render")]
    pub fn debug_view(&self) -> Option<&SolverDebugView> {
        self.debug_view.as_ref()
    }

    /// Advance to `frame`, then run every sub-step its `time_interval_in_seconds`
    /// requires. Initializes internal state on the first call.
    pub fn on_update(&mut self, frame: Frame, rng: &mut impl RandomSource) {
        if self.current_frame.is_none() {
            self.current_frame = Some(Frame::new(0, frame.time_interval_in_seconds));
        }
        let span = tracing::info_span!("sph_frame", frame = frame.index);
        let _guard = span.enter();
        self.advance_time_step(frame.time_interval_in_seconds, rng);
        self.current_frame = Some(frame);
    }

    fn advance_time_step(&mut self, dt: f32, rng: &mut impl RandomSource) {
        let mut remaining = dt;
        while remaining > EPSILON {
            let desired = self.desired_step();
            let num_steps = (remaining / desired).ceil().max(1.0);
            let actual_dt = remaining / num_steps;
            self.sub_step(actual_dt, rng);
            remaining -= actual_dt;
        }
    }

    fn desired_step(&self) -> f32 {
        let h = self.data.kernel_radius();
        let by_speed = TIME_STEP_SPEED_FACTOR * h / self.params.speed_of_sound;
        let by_force = if self.max_force_magnitude == 0.0 {
            f32::INFINITY
        } else {
            TIME_STEP_FORCE_FACTOR * (h * self.data.mass() / self.max_force_magnitude).sqrt()
        };
        self.params.time_step_limit_scale * by_speed.min(by_force)
    }

    fn sub_step(&mut self, dt: f32, rng: &mut impl RandomSource) {
        let span = tracing::debug_span!("sub_step", dt);
        let _guard = span.enter();
        self.begin(rng);
        self.accumulate_forces();
        self.integrate(dt);
        self.collide();
        self.end(dt);
        tracing::debug!(max_density = self.max_density, num_particles = self.data.len(), "sub-step complete");
    }

    fn begin(&mut self, rng: &mut impl RandomSource) {
        self.data.clear_forces();

        if let Some(collider) = &mut self.collider {
            collider.tick(0.0);
        }
        if let Some(mut emitter) = self.emitter.take() {
            emitter.update(self.dim, &mut self.data, rng);
            self.emitter = Some(emitter);
        }

        let n = self.data.len();
        if self.scratch_positions.len() < n {
            self.scratch_positions.resize(n, Vector3::ZERO);
        }
        if self.scratch_velocities.len() < n {
            self.scratch_velocities.resize(n, Vector3::ZERO);
        }

        if n == 0 {
            self.neighbor_lists.clear();
            return;
        }

        let h = self.data.kernel_radius();
        let resolution = self.build_resolution(h);
        let mut searcher = PointHashGridSearcher::new(resolution, h, self.dim)
            .expect("solver derives a valid resolution and a positive kernel radius");
        let positions = self.data.positions();
        searcher.build(positions);
        self.neighbor_lists = searcher.build_neighbor_lists(positions, h);

        #[cfg(feature = "debug-render")]
        if self.debug_enabled {
            self.debug_view = Some(SolverDebugView {
                collider_lines: self.collider_debug_lines(),
                occupied_buckets: self.neighbor_lists.iter().filter(|l| !l.is_empty()).count(),
            });
        }

        self.update_density();
        self.update_pressure();
    }

    fn build_resolution(&self, grid_spacing: f32) -> (i32, i32, i32) {
        let positions = self.data.positions();
        if positions.is_empty() {
            return (MIN_GRID_RESOLUTION, MIN_GRID_RESOLUTION, MIN_GRID_RESOLUTION);
        }
        let mut lower = positions[0];
        let mut upper = positions[0];
        for &p in positions {
            lower = lower.min(p);
            upper = upper.max(p);
        }
        let extent = upper - lower;
        let axis_resolution = |e: f32| ((e / grid_spacing).ceil() as i32 + 4).max(MIN_GRID_RESOLUTION);
        let rz = if self.dim == Dimension::Three { axis_resolution(extent.z) } else { 1 };
        (axis_resolution(extent.x), axis_resolution(extent.y), rz)
    }

    #[cfg(feature = "debug-render")]
    fn collider_debug_lines(&self) -> Vec<DebugLine> {
        let Some(collider) = &self.collider else {
            return Vec::new();
        };
        let Some(bounds) = collider.surface.bounding_box(self.dim) else {
            return Vec::new();
        };
        let corners = bounds.corners(self.dim);
        corners
            .windows(2)
            .map(|w| DebugLine { start: w[0], end: w[1] })
            .collect()
    }

    fn update_density(&mut self) {
        let n = self.data.len();
        let positions = self.data.positions().to_vec();
        let mass = self.data.mass();
        let h = self.data.kernel_radius();
        let kernel = StdKernel::new(h, self.dim);
        let neighbor_lists = &self.neighbor_lists;
        let densities: Vec<f32> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut sum = kernel.value(0.0);
                for &j in &neighbor_lists[i] {
                    sum += kernel.value((positions[i] - positions[j]).length());
                }
                mass * sum
            })
            .collect();
        self.data.density_mut().copy_from_slice(&densities);
    }

    fn update_pressure(&mut self) {
        let density0 = self.data.target_density();
        let c = self.params.speed_of_sound;
        let gamma = self.params.eos_exponent;
        let negative_scale = self.params.negative_pressure_scale;
        let b = density0 * c * c / gamma;
        let pressures: Vec<f32> = self
            .data
            .density()
            .iter()
            .map(|&rho| {
                let mut p = b * ((rho / density0).powf(gamma) - 1.0);
                if p < 0.0 {
                    p *= negative_scale;
                }
                p
            })
            .collect();
        self.data.pressure_mut().copy_from_slice(&pressures);
    }

    fn accumulate_forces(&mut self) {
        let n = self.data.len();
        if n == 0 {
            self.max_force_magnitude = 0.0;
            return;
        }
        let positions = self.data.positions().to_vec();
        let velocities = self.data.velocities().to_vec();
        let densities = self.data.density().to_vec();
        let pressures = self.data.pressure().to_vec();
        let mass = self.data.mass();
        let h = self.data.kernel_radius();
        let spiky = SpikyKernel::new(h, self.dim);
        let gravity = self.params.gravity;
        let drag = self.params.drag_coefficient;
        let viscosity_coefficient = self.params.viscosity_coefficient;
        let wind = self.wind;
        let neighbor_lists = &self.neighbor_lists;

        let forces: Vec<Vector3> = (0..n)
            .into_par_iter()
            .map(|i| {
                let wind_velocity = wind.sample(positions[i]);
                let mut force = gravity * mass + (velocities[i] - wind_velocity) * (-drag);
                for &j in &neighbor_lists[i] {
                    let delta = positions[i] - positions[j];
                    let d = delta.length();
                    if d > 0.0 {
                        let dir = (positions[j] - positions[i]) / d;
                        let pressure_term = pressures[i] / (densities[i] * densities[i])
                            + pressures[j] / (densities[j] * densities[j]);
                        force -= spiky.gradient(d, dir) * (mass * mass * pressure_term);
                    }
                    force += (velocities[j] - velocities[i])
                        * (viscosity_coefficient * mass * mass / densities[j] * spiky.second_derivative(d));
                }
                force
            })
            .collect();

        self.max_force_magnitude = forces.iter().map(|f| f.length()).fold(0.0, f32::max);
        self.data.forces_mut().copy_from_slice(&forces);
    }

    fn integrate(&mut self, dt: f32) {
        let n = self.data.len();
        let mass = self.data.mass();
        let positions = self.data.positions();
        let velocities = self.data.velocities();
        let forces = self.data.forces();
        for i in 0..n {
            let new_velocity = velocities[i] + (forces[i] / mass) * dt;
            let new_position = positions[i] + new_velocity * dt;
            self.scratch_velocities[i] = new_velocity;
            self.scratch_positions[i] = new_position;
        }
    }

    fn collide(&mut self) {
        let Some(collider) = &self.collider else {
            return;
        };
        let radius = self.data.radius();
        let restitution = self.params.restitution_coefficient;
        let n = self.data.len();
        for i in 0..n {
            collider.resolve_collision(
                self.dim,
                radius,
                restitution,
                &mut self.scratch_positions[i],
                &mut self.scratch_velocities[i],
            );
        }
    }

    fn end(&mut self, dt: f32) {
        let n = self.data.len();
        self.data.positions_mut()[..n].copy_from_slice(&self.scratch_positions[..n]);
        self.data.velocities_mut()[..n].copy_from_slice(&self.scratch_velocities[..n]);

        if n > 0 {
            self.smooth_velocities(dt);
        }

        self.max_density = self.data.density().iter().cloned().fold(0.0, f32::max);
    }

    fn smooth_velocities(&mut self, dt: f32) {
        let n = self.data.len();
        let positions = self.data.positions().to_vec();
        let velocities = self.data.velocities().to_vec();
        let densities = self.data.density().to_vec();
        let mass = self.data.mass();
        let h = self.data.kernel_radius();
        let spiky = SpikyKernel::new(h, self.dim);
        let blend = (dt * self.params.pseudo_viscosity_coefficient).clamp(0.0, 1.0);
        let neighbor_lists = &self.neighbor_lists;

        let smoothed: Vec<Vector3> = (0..n)
            .into_par_iter()
            .map(|i| {
                let self_weight = mass / densities[i] * spiky.value(0.0);
                let mut weight_sum = self_weight;
                let mut accum = velocities[i] * self_weight;
                for &j in &neighbor_lists[i] {
                    let d = (positions[i] - positions[j]).length();
                    let weight = mass / densities[j] * spiky.value(d);
                    weight_sum += weight;
                    accum += velocities[j] * weight;
                }
                let smoothed_velocity = if weight_sum > 0.0 { accum / weight_sum } else { velocities[i] };
                velocities[i].lerp(smoothed_velocity, blend)
            })
            .collect();

        self.data.velocities_mut().copy_from_slice(&smoothed);
    }
}
