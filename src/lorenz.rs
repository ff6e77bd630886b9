//! Forward-Euler integration of the Lorenz system.
//!
//! [`Lorenz`] owns an append-only trajectory seeded with a single point. Every
//! call to [`Lorenz::step`] advances the last point by one explicit Euler step
//! and appends it together with its progress color.
//!
//! # Example
//!
//! ```
//! use lorenz_viewer::{DVec3, Lorenz};
//!
//! let mut lorenz = Lorenz::new(DVec3::new(0.0, 1.0, 1.05));
//! lorenz.step_n(5);
//!
//! assert_eq!(lorenz.len(), 6);
//! assert_eq!(lorenz.colors().len(), 6);
//! ```

use std::path::Path;

use glam::{DVec3, Vec3};

use crate::color::progress_color;
use crate::error::{ExportError, IntegrationError};
use crate::export::{export_points, ExportFormat};

/// Lorenz constants and the fixed integration time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzParams {
    /// Prandtl number (σ).
    pub sigma: f64,
    /// Rayleigh number (ρ).
    pub rho: f64,
    /// Geometric factor (β).
    pub beta: f64,
    /// Time step (Δt).
    pub dt: f64,
}

impl LorenzParams {
    pub fn new(sigma: f64, rho: f64, beta: f64, dt: f64) -> Self {
        Self { sigma, rho, beta, dt }
    }

    /// One explicit Euler step from `p`.
    #[inline]
    pub fn euler_step(&self, p: DVec3) -> DVec3 {
        let dx = self.sigma * (p.y - p.x) * self.dt;
        let dy = (p.x * (self.rho - p.z) - p.y) * self.dt;
        let dz = (p.x * p.y - self.beta * p.z) * self.dt;
        DVec3::new(p.x + dx, p.y + dy, p.z + dz)
    }
}

impl Default for LorenzParams {
    /// σ = 10, ρ = 28, β = 8/3, Δt = 0.01.
    fn default() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0, 0.01)
    }
}

/// Points and their colors, paired index for index.
///
/// The seed point is colored as if it had just been appended to an empty
/// trajectory, so `colors[i]` is always `progress_color(i + 1)`.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    points: Vec<DVec3>,
    colors: Vec<Vec3>,
}

impl Trajectory {
    fn seeded(seed: DVec3) -> Self {
        let mut trajectory = Self::default();
        trajectory.push(seed);
        trajectory
    }

    fn push(&mut self, point: DVec3) {
        self.points.push(point);
        self.colors.push(progress_color(self.points.len()));
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(point, color)` pairs in append order.
    pub fn iter(&self) -> impl Iterator<Item = (DVec3, Vec3)> + '_ {
        self.points.iter().copied().zip(self.colors.iter().copied())
    }
}

/// The Lorenz integrator.
#[derive(Debug, Clone)]
pub struct Lorenz {
    params: LorenzParams,
    trajectory: Trajectory,
}

impl Lorenz {
    /// Start a trajectory at `seed` with the standard constants.
    pub fn new(seed: DVec3) -> Self {
        Self::with_params(seed, LorenzParams::default())
    }

    /// Start a trajectory at `seed` with custom constants.
    pub fn with_params(seed: DVec3, params: LorenzParams) -> Self {
        Self {
            params,
            trajectory: Trajectory::seeded(seed),
        }
    }

    /// Advance by one Euler step and return the new point.
    ///
    /// Non-finite results are appended as-is; use [`Lorenz::try_step`] to
    /// reject them.
    pub fn step(&mut self) -> DVec3 {
        let next = self.params.euler_step(self.last());
        self.trajectory.push(next);
        next
    }

    /// Like [`Lorenz::step`], but refuses to append a non-finite point.
    pub fn try_step(&mut self) -> Result<DVec3, IntegrationError> {
        let next = self.params.euler_step(self.last());
        if !next.is_finite() {
            return Err(IntegrationError::Degenerate {
                step: self.trajectory.len(),
                point: next,
            });
        }
        self.trajectory.push(next);
        Ok(next)
    }

    /// Take `n` unguarded steps.
    pub fn step_n(&mut self, n: usize) {
        self.trajectory.points.reserve(n);
        self.trajectory.colors.reserve(n);
        for _ in 0..n {
            self.step();
        }
    }

    /// The most recent point.
    pub fn last(&self) -> DVec3 {
        // The trajectory is seeded on construction and never shrinks.
        self.trajectory.points[self.trajectory.points.len() - 1]
    }

    /// Number of points, seed included.
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn points(&self) -> &[DVec3] {
        self.trajectory.points()
    }

    pub fn colors(&self) -> &[Vec3] {
        self.trajectory.colors()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn params(&self) -> &LorenzParams {
        &self.params
    }

    /// Mutable access to the constants.
    ///
    /// Changes apply from the next step on. Large edits can drive the system to
    /// infinity; [`Lorenz::try_step`] catches that.
    pub fn params_mut(&mut self) -> &mut LorenzParams {
        &mut self.params
    }

    /// Write every point so far to `path`, replacing any existing file.
    pub fn export(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<(), ExportError> {
        export_points(path, self.points(), format)
    }
}
