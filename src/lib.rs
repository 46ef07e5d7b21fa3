//! # boidsim
//!
//! A 2-D boid flocking simulation core, implemented twice over the same
//! model: a serial reference engine on the CPU and a data-parallel engine
//! dispatched as a wgpu compute shader over double-buffered storage.
//!
//! ## Quick Start
//!
//! ```ignore
//! use boidsim::prelude::*;
//!
//! fn main() -> Result<(), FlockError> {
//!     let mut engine = boidsim::init(Backend::Serial, FlockConfig::default(), 500)?;
//!
//!     // Per animation tick: advance, then hand the state to a renderer.
//!     engine.step();
//!     let state = engine.current_state()?;
//!     println!("first boid at {:?}", state[0].position);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The model
//!
//! Every boid carries a position in the `[-1, 1]` square and a velocity.
//! Each tick, every boid scans every other boid (deliberately O(n²), no
//! spatial acceleration) and blends three steering contributions:
//!
//! - **cohesion** toward the centroid of boids within `cohesion_radius`,
//! - **alignment** with the average velocity within `alignment_radius`,
//! - **separation** away from boids within `separation_radius`.
//!
//! The updated velocity is clamped to `max_speed`, integrated over a unit
//! time step, and positions wrap toroidally at the domain edges.
//!
//! ### Two engines, one force law
//!
//! [`SerialFlock`] runs the scan single-threaded with snapshot semantics:
//! every update reads only the previous tick's state. [`GpuFlock`] runs
//! one compute lane per boid over two ping-pong storage buffers; a lane
//! reads the settled previous frame and writes exactly its own record of
//! the other buffer, and the buffer roles swap after every dispatch. Given
//! the same inputs, the per-boid transition is numerically identical in
//! both engines.
//!
//! Rendering is an external collaborator: the engines expose per-boid
//! state (and, for [`GpuFlock`], the current read buffer itself) but never
//! draw.

pub mod boid;
pub mod config;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod serial;

pub use boid::{clamp_speed, steering_delta, wrap_position, Boid, BoidState, SEPARATION_EPSILON};
pub use config::{FlockConfig, DEFAULT_POPULATION, SIM_SCALE};
pub use engine::{init, Backend, FlockEngine};
pub use error::FlockError;
pub use gpu::{GpuContext, GpuFlock, WORKGROUP_SIZE};
pub use serial::SerialFlock;

pub use bytemuck;
pub use glam::Vec2;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use boidsim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::boid::{Boid, BoidState};
    pub use crate::config::{FlockConfig, DEFAULT_POPULATION};
    pub use crate::engine::{init, Backend, FlockEngine};
    pub use crate::error::FlockError;
    pub use crate::gpu::{GpuContext, GpuFlock};
    pub use crate::serial::SerialFlock;
    pub use crate::Vec2;
}
