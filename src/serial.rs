//! The serial flocking engine.
//!
//! Reference implementation: one full O(n²) neighbor scan per tick,
//! single-threaded and fully synchronous on host memory. Every boid's
//! update reads a snapshot of the previous tick, so no boid ever observes
//! another boid's already-updated state within the same tick.

use crate::boid::{clamp_speed, steering_delta, wrap_position, Boid, BoidState};
use crate::config::FlockConfig;
use crate::engine::FlockEngine;
use crate::error::FlockError;

/// CPU-resident flock advanced by the reference algorithm.
pub struct SerialFlock {
    config: FlockConfig,
    boids: Vec<Boid>,
    /// Previous tick's state, refilled at the top of every step.
    snapshot: Vec<Boid>,
}

impl SerialFlock {
    /// Create a flock of `population` randomly spawned boids.
    ///
    /// A population of zero is legal and produces a no-op simulation.
    pub fn new(config: FlockConfig, population: u32) -> Result<Self, FlockError> {
        config.validate()?;
        let mut rng = rand::thread_rng();
        let boids = (0..population).map(|_| Boid::spawn(&mut rng)).collect();
        Ok(Self {
            config,
            snapshot: Vec::new(),
            boids,
        })
    }

    /// Create a flock from an explicit population, for deterministic
    /// setups.
    pub fn with_boids(config: FlockConfig, boids: Vec<Boid>) -> Result<Self, FlockError> {
        config.validate()?;
        Ok(Self {
            config,
            snapshot: Vec::new(),
            boids,
        })
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// The live boid array, including derived orientations.
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        // Neighbor queries must only see the previous tick, so the scan
        // reads a snapshot while writes go to the live array.
        self.snapshot.clear();
        self.snapshot.extend_from_slice(&self.boids);
        let snapshot = &self.snapshot;

        for (i, boid) in self.boids.iter_mut().enumerate() {
            let others = snapshot
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| (other.position, other.velocity));
            let delta = steering_delta(boid.position, others, &self.config);

            boid.velocity = clamp_speed(boid.velocity + delta, self.config.max_speed);
            boid.position = wrap_position(boid.position + boid.velocity);
            boid.orientation = Boid::heading(boid.velocity);
        }
    }
}

impl FlockEngine for SerialFlock {
    fn step(&mut self) {
        SerialFlock::step(self);
    }

    fn population(&self) -> u32 {
        self.boids.len() as u32
    }

    fn current_state(&self) -> Result<Vec<BoidState>, FlockError> {
        Ok(self.boids.iter().map(|&boid| BoidState::from(boid)).collect())
    }
}
