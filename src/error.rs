//! Error types for the flocking engines.
//!
//! All failure modes are front-loaded into engine construction; once an
//! engine exists, `step` cannot fail.

use std::fmt;

/// Errors that can occur while constructing a flocking engine or reading
/// its state back from the GPU.
#[derive(Debug)]
pub enum FlockError {
    /// A configuration field is out of range.
    InvalidConfig(String),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// The selected adapter does not support compute shaders.
    ComputeUnsupported,
    /// Failed to create the GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map a GPU buffer for readback.
    BufferMapping(String),
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockError::InvalidConfig(msg) => write!(f, "Invalid flock configuration: {}", msg),
            FlockError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            FlockError::ComputeUnsupported => write!(f, "The selected GPU adapter does not support compute shaders"),
            FlockError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            FlockError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
        }
    }
}

impl std::error::Error for FlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlockError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for FlockError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        FlockError::DeviceCreation(e)
    }
}
