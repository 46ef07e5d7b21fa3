//! Headless GPU context acquisition.

use crate::error::FlockError;

/// Owns the wgpu device and queue used by the parallel engine.
///
/// Acquiring a context is the only point where the parallel engine can
/// fail for accelerator reasons; callers must treat that failure as fatal
/// to the parallel path rather than silently downgrading to the serial
/// engine.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Acquire a context, blocking on the adapter and device requests.
    pub fn new() -> Result<Self, FlockError> {
        pollster::block_on(Self::new_async())
    }

    /// Asynchronous variant of [`Self::new`] for callers already inside a
    /// runtime.
    pub async fn new_async() -> Result<Self, FlockError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(|_| FlockError::NoAdapter)?;

        // Downlevel adapters may not run compute shaders at all; reject
        // them here instead of failing on the first dispatch.
        let capabilities = adapter.get_downlevel_capabilities();
        if !capabilities
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return Err(FlockError::ComputeUnsupported);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flock device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                ..Default::default()
            })
            .await?;

        Ok(Self { device, queue })
    }
}
