//! Engine selection and the common engine surface.
//!
//! The two engines implement the same model behind one trait; callers pick
//! an execution strategy with a [`Backend`] value rather than a subclass.

use crate::boid::BoidState;
use crate::config::FlockConfig;
use crate::error::FlockError;
use crate::gpu::GpuFlock;
use crate::serial::SerialFlock;

/// The capability set every flocking engine provides.
///
/// Construction and teardown are the Rust-native halves of the lifecycle:
/// engines are built with their constructors (or [`init`]) and release all
/// owned resources on drop. Within one animation tick `step` must run
/// before the renderer collaborator reads the state.
pub trait FlockEngine {
    /// Advance the simulation by exactly one tick. Never fails once the
    /// engine is constructed.
    fn step(&mut self);

    /// Population size, fixed for the engine's lifetime.
    fn population(&self) -> u32;

    /// Read-only copy of the current per-boid state.
    ///
    /// The serial engine cannot fail here; the parallel engine can surface
    /// a buffer-mapping error from readback.
    fn current_state(&self) -> Result<Vec<BoidState>, FlockError>;
}

/// Which execution strategy backs an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Host-resident O(n²) reference algorithm.
    Serial,
    /// Compute dispatch over double-buffered GPU storage.
    Gpu,
}

/// Construct an engine for the chosen backend.
///
/// Fails fast: an invalid configuration or an unavailable GPU prevents the
/// first tick from ever running. There is no automatic fallback from
/// [`Backend::Gpu`] to [`Backend::Serial`].
pub fn init(
    backend: Backend,
    config: FlockConfig,
    population: u32,
) -> Result<Box<dyn FlockEngine>, FlockError> {
    match backend {
        Backend::Serial => Ok(Box::new(SerialFlock::new(config, population)?)),
        Backend::Gpu => Ok(Box::new(GpuFlock::new(config, population)?)),
    }
}
