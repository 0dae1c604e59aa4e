//! SPH smoothing kernels.
//!
//! Two families, each parameterized by [`Dimension`] and kernel radius
//! `h`: the standard (poly6-style) kernel used for density estimation, and
//! the spiky kernel used for pressure/viscosity gradients. Both go to zero
//! (value and every derivative) at `d >= h`.

use crate::geometry::{Dimension, Vector3};
use std::f32::consts::PI;

/// The standard SPH kernel, used for density estimation.
#[derive(Debug, Clone, Copy)]
pub struct StdKernel {
    pub h: f32,
    dim: Dimension,
}

impl StdKernel {
    pub fn new(h: f32, dim: Dimension) -> Self {
        Self { h, dim }
    }

    /// `W(d)`.
    pub fn value(&self, d: f32) -> f32 {
        if d >= self.h {
            return 0.0;
        }
        let x = 1.0 - (d / self.h) * (d / self.h);
        let x3 = x * x * x;
        match self.dim {
            Dimension::Two => 4.0 / (PI * self.h.powi(2)) * x3,
            Dimension::Three => 315.0 / (64.0 * PI * self.h.powi(3)) * x3,
        }
    }
}

/// The spiky SPH kernel, used for pressure and viscosity.
#[derive(Debug, Clone, Copy)]
pub struct SpikyKernel {
    pub h: f32,
    dim: Dimension,
}

impl SpikyKernel {
    pub fn new(h: f32, dim: Dimension) -> Self {
        Self { h, dim }
    }

    fn q(&self, d: f32) -> Option<f32> {
        if d < self.h {
            Some(1.0 - d / self.h)
        } else {
            None
        }
    }

    /// `W(d)`.
    pub fn value(&self, d: f32) -> f32 {
        let Some(q) = self.q(d) else {
            return 0.0;
        };
        match self.dim {
            Dimension::Two => 10.0 / (PI * self.h.powi(2)) * q.powi(3),
            Dimension::Three => 15.0 / (PI * self.h.powi(3)) * q.powi(3),
        }
    }

    /// `dW/dd`.
    pub fn first_derivative(&self, d: f32) -> f32 {
        let Some(q) = self.q(d) else {
            return 0.0;
        };
        match self.dim {
            Dimension::Two => -30.0 / (PI * self.h.powi(3)) * q * q,
            Dimension::Three => -45.0 / (PI * self.h.powi(4)) * q * q,
        }
    }

    /// `d^2W/dd^2`.
    pub fn second_derivative(&self, d: f32) -> f32 {
        let Some(q) = self.q(d) else {
            return 0.0;
        };
        match self.dim {
            Dimension::Two => 60.0 / (PI * self.h.powi(4)) * q,
            Dimension::Three => 90.0 / (PI * self.h.powi(5)) * q,
        }
    }

    /// `∇W(d, dir) = -firstDerivative(d) * dir`, where `dir` points from the
    /// neighbor toward the kernel center. Callers building
    /// `dir = (center - neighbor).normalized()` and accumulating
    /// `-m^2 (p_i/rho_i^2 + p_j/rho_j^2) * gradient` get the canonical
    /// repulsive pressure force.
    pub fn gradient(&self, d: f32, dir: Vector3) -> Vector3 {
        -self.first_derivative(d) * dir
    }
}
