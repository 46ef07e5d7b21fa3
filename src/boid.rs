//! The boid entity model and the shared force law.
//!
//! Both engines run the same per-boid transition: a full neighbor scan
//! accumulating cohesion, alignment and separation contributions, a speed
//! clamp, unit-time integration, and a toroidal edge wrap. The serial
//! engine calls the functions here directly; the compute shader in
//! [`crate::gpu`] mirrors them operation for operation so the two
//! trajectories stay equivalent.

use std::f32::consts::{FRAC_PI_2, PI};

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::Rng;

use crate::config::FlockConfig;

/// Floor for the squared distance in the separation term, so two boids at
/// near-zero distance produce a large but finite repulsion.
pub const SEPARATION_EPSILON: f32 = 1e-4;

/// A flocking agent as the serial engine stores it.
///
/// `orientation` is derived, not authoritative: it is recomputed from the
/// velocity after every step so a sprite's forward axis tracks travel
/// direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    /// Position inside the `[-1, 1]` x `[-1, 1]` domain.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians.
    pub orientation: f32,
}

impl Boid {
    /// Spawn a boid with a uniform-random position, a small random
    /// velocity and a random orientation.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        Self {
            position: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            velocity: Vec2::new(rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01)),
            orientation: rng.gen_range(0.0..2.0 * PI),
        }
    }

    /// Heading derived from a velocity, offset so that a sprite modeled
    /// pointing up faces along the travel direction.
    pub fn heading(velocity: Vec2) -> f32 {
        velocity.y.atan2(velocity.x) + FRAC_PI_2
    }
}

/// GPU-layout boid record: position and velocity packed into 16 bytes.
///
/// This is the element type of the flock storage buffers and the record
/// returned by state readback. Orientation is not stored; a renderer
/// derives it from the velocity.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BoidState {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl BoidState {
    /// Spawn a boid with a uniform-random position and a random heading at
    /// exactly `max_speed`.
    pub fn spawn<R: Rng>(rng: &mut R, max_speed: f32) -> Self {
        let heading = rng.gen_range(0.0..2.0 * PI);
        Self {
            position: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            velocity: Vec2::new(heading.cos(), heading.sin()) * max_speed,
        }
    }
}

impl From<Boid> for BoidState {
    fn from(boid: Boid) -> Self {
        Self {
            position: boid.position,
            velocity: boid.velocity,
        }
    }
}

/// Compute the velocity change for one boid from a scan of all other boids.
///
/// `others` yields the previous tick's `(position, velocity)` of every boid
/// except the one being updated. The three contributions are accumulated
/// independently and summed, so none of them observes a partially updated
/// velocity. Pure function of its inputs.
pub fn steering_delta<I>(position: Vec2, others: I, config: &FlockConfig) -> Vec2
where
    I: IntoIterator<Item = (Vec2, Vec2)>,
{
    let cohesion_r2 = config.cohesion_radius * config.cohesion_radius;
    let alignment_r2 = config.alignment_radius * config.alignment_radius;
    let separation_r2 = config.separation_radius * config.separation_radius;

    let mut cohesion = Vec2::ZERO;
    let mut alignment = Vec2::ZERO;
    let mut separation = Vec2::ZERO;
    let mut cohesion_count = 0u32;
    let mut alignment_count = 0u32;
    let mut separation_count = 0u32;

    for (other_position, other_velocity) in others {
        let d = other_position - position;
        let dist_sq = d.length_squared();

        if dist_sq < cohesion_r2 {
            cohesion += other_position;
            cohesion_count += 1;
        }
        if dist_sq < alignment_r2 {
            alignment += other_velocity;
            alignment_count += 1;
        }
        if dist_sq < separation_r2 {
            separation -= d / dist_sq.max(SEPARATION_EPSILON);
            separation_count += 1;
        }
    }

    let mut delta = Vec2::ZERO;
    if cohesion_count > 0 {
        let center = cohesion / cohesion_count as f32;
        // The cohesion weight is applied twice, once folded into the
        // centroid offset and once on the velocity update. Intentional;
        // the compute shader matches it exactly.
        delta += (center - position) * config.cohesion_weight * config.cohesion_weight;
    }
    if alignment_count > 0 {
        delta += alignment / alignment_count as f32 * config.alignment_weight;
    }
    if separation_count > 0 {
        delta += separation * config.separation_weight;
    }
    delta
}

/// Rescale a velocity that exceeds `max_speed` to exactly `max_speed`.
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > max_speed {
        velocity / speed * max_speed
    } else {
        velocity
    }
}

/// Toroidal edge wrap: a coordinate leaving the domain teleports to the
/// opposite edge, each axis independently.
pub fn wrap_position(mut position: Vec2) -> Vec2 {
    if position.x > 1.0 {
        position.x = -1.0;
    }
    if position.x < -1.0 {
        position.x = 1.0;
    }
    if position.y > 1.0 {
        position.y = -1.0;
    }
    if position.y < -1.0 {
        position.y = 1.0;
    }
    position
}
