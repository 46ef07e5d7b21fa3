//! Simulation configuration.
//!
//! A [`FlockConfig`] is shared by both engines and is immutable once an
//! engine has been constructed from it. Interaction radii are expressed as
//! a base simulation scale times a tunable multiplier.

use bytemuck::{Pod, Zeroable};

use crate::error::FlockError;

/// Base scale folded into the default interaction radii and speed limit.
pub const SIM_SCALE: f32 = 0.1;

/// Default population size.
pub const DEFAULT_POPULATION: u32 = 500;

/// Tunable parameters of the flocking force law.
///
/// Radii are interaction distance thresholds; all distance tests compare
/// squared distances against squared radii so the neighbor scan never takes
/// a square root. Weights blend the three steering contributions into the
/// velocity update, and `max_speed` clamps the resulting speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    /// Boids closer than this pull toward their common centroid.
    pub cohesion_radius: f32,
    /// Boids closer than this steer toward their average heading.
    pub alignment_radius: f32,
    /// Boids closer than this repel each other.
    pub separation_radius: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub separation_weight: f32,
    /// Upper bound on speed, enforced after every velocity update.
    pub max_speed: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            cohesion_radius: 0.3 * SIM_SCALE,
            alignment_radius: 0.2 * SIM_SCALE,
            separation_radius: 0.1 * SIM_SCALE,
            cohesion_weight: 0.01,
            alignment_weight: 0.05,
            separation_weight: 0.05,
            max_speed: 0.01 * SIM_SCALE,
        }
    }
}

impl FlockConfig {
    /// Check the configuration for out-of-range values.
    ///
    /// Engines call this at construction time; `step` never re-validates.
    pub fn validate(&self) -> Result<(), FlockError> {
        for (name, value) in [
            ("cohesion_radius", self.cohesion_radius),
            ("alignment_radius", self.alignment_radius),
            ("separation_radius", self.separation_radius),
            ("cohesion_weight", self.cohesion_weight),
            ("alignment_weight", self.alignment_weight),
            ("separation_weight", self.separation_weight),
        ] {
            if !(value >= 0.0) {
                return Err(FlockError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.max_speed > 0.0) {
            return Err(FlockError::InvalidConfig(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        Ok(())
    }

    pub(crate) fn to_gpu(self) -> GpuFlockConfig {
        GpuFlockConfig {
            cohesion_radius: self.cohesion_radius,
            alignment_radius: self.alignment_radius,
            separation_radius: self.separation_radius,
            cohesion_weight: self.cohesion_weight,
            alignment_weight: self.alignment_weight,
            separation_weight: self.separation_weight,
            max_speed: self.max_speed,
            _padding: 0.0,
        }
    }
}

/// Uniform-buffer mirror of [`FlockConfig`].
///
/// Field order matches the WGSL `Params` struct; padded to 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct GpuFlockConfig {
    cohesion_radius: f32,
    alignment_radius: f32,
    separation_radius: f32,
    cohesion_weight: f32,
    alignment_weight: f32,
    separation_weight: f32,
    max_speed: f32,
    _padding: f32,
}
