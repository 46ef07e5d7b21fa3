//! The parallel flocking engine.
//!
//! Runs the same force law as [`crate::serial`], fanned out as one compute
//! lane per boid. State lives in two GPU storage buffers of identical
//! layout: every dispatch reads the settled previous tick from one buffer
//! and writes the next tick into the other, and the two roles swap after
//! each step. Since no lane ever reads the write buffer, the dispatch
//! needs no synchronization beyond the queue's submission ordering.

mod context;

pub use context::GpuContext;

use wgpu::util::DeviceExt;

use crate::boid::BoidState;
use crate::config::FlockConfig;
use crate::engine::FlockEngine;
use crate::error::FlockError;

/// Lanes per workgroup; dispatches cover the population with
/// `ceil(population / WORKGROUP_SIZE)` groups.
pub const WORKGROUP_SIZE: u32 = 256;

/// Per-boid update, mirroring the serial engine operation for operation.
/// Lanes past the population bound return without writing.
const COMPUTE_SHADER: &str = r#"
struct Boid {
    position: vec2<f32>,
    velocity: vec2<f32>,
};

struct Params {
    cohesion_radius: f32,
    alignment_radius: f32,
    separation_radius: f32,
    cohesion_weight: f32,
    alignment_weight: f32,
    separation_weight: f32,
    max_speed: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<storage, read> boids_src: array<Boid>;

@group(0) @binding(1)
var<storage, read_write> boids_dst: array<Boid>;

@group(0) @binding(2)
var<uniform> params: Params;

@compute @workgroup_size(256)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let index = global_id.x;
    let count = arrayLength(&boids_src);

    if index >= count {
        return;
    }

    var boid = boids_src[index];

    var cohesion = vec2<f32>(0.0, 0.0);
    var alignment = vec2<f32>(0.0, 0.0);
    var separation = vec2<f32>(0.0, 0.0);
    var cohesion_count = 0u;
    var alignment_count = 0u;
    var separation_count = 0u;

    for (var j = 0u; j < count; j = j + 1u) {
        if j == index {
            continue;
        }

        let other = boids_src[j];
        let d = other.position - boid.position;
        let dist_sq = dot(d, d);

        if dist_sq < params.cohesion_radius * params.cohesion_radius {
            cohesion += other.position;
            cohesion_count += 1u;
        }
        if dist_sq < params.alignment_radius * params.alignment_radius {
            alignment += other.velocity;
            alignment_count += 1u;
        }
        if dist_sq < params.separation_radius * params.separation_radius {
            separation -= d / max(dist_sq, 1e-4);
            separation_count += 1u;
        }
    }

    if cohesion_count > 0u {
        let center = cohesion / f32(cohesion_count);
        // Cohesion weight applied twice, matching the serial engine.
        boid.velocity += (center - boid.position)
            * params.cohesion_weight * params.cohesion_weight;
    }
    if alignment_count > 0u {
        boid.velocity += alignment / f32(alignment_count) * params.alignment_weight;
    }
    if separation_count > 0u {
        boid.velocity += separation * params.separation_weight;
    }

    let speed = length(boid.velocity);
    if speed > params.max_speed {
        boid.velocity = boid.velocity / speed * params.max_speed;
    }

    boid.position += boid.velocity;

    if boid.position.x > 1.0 {
        boid.position.x = -1.0;
    }
    if boid.position.x < -1.0 {
        boid.position.x = 1.0;
    }
    if boid.position.y > 1.0 {
        boid.position.y = -1.0;
    }
    if boid.position.y < -1.0 {
        boid.position.y = 1.0;
    }

    boids_dst[index] = boid;
}
"#;

/// GPU-resident flock advanced by a compute dispatch over double-buffered
/// storage.
///
/// The engine exclusively owns both flock buffers. The read/write
/// designation is mutated only at the single swap point at the end of
/// [`GpuFlock::step`]; a renderer may bind [`GpuFlock::current_buffer`] as
/// an instance buffer but must never write to it.
pub struct GpuFlock {
    context: GpuContext,
    pipeline: wgpu::ComputePipeline,
    buffers: [wgpu::Buffer; 2],
    bind_groups: [wgpu::BindGroup; 2],
    population: u32,
    /// Index of the buffer holding the settled current state.
    read_index: usize,
    config: FlockConfig,
}

impl GpuFlock {
    /// Create a flock of `population` boids with random positions and
    /// random headings at exactly `max_speed`.
    ///
    /// Fails fast when the configuration is invalid or no compute-capable
    /// GPU is available; there is no fallback to the serial engine.
    pub fn new(config: FlockConfig, population: u32) -> Result<Self, FlockError> {
        config.validate()?;
        let mut rng = rand::thread_rng();
        let seed: Vec<BoidState> = (0..population)
            .map(|_| BoidState::spawn(&mut rng, config.max_speed))
            .collect();
        Self::with_state(config, &seed)
    }

    /// Create a flock from an explicit initial population, for
    /// deterministic setups.
    pub fn with_state(config: FlockConfig, seed: &[BoidState]) -> Result<Self, FlockError> {
        config.validate()?;
        let context = GpuContext::new()?;
        let population = seed.len() as u32;

        let module = context
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("flock compute shader"),
                source: wgpu::ShaderSource::Wgsl(COMPUTE_SHADER.into()),
            });

        let bind_group_layout =
            context
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("flock bind group layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: true },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: false },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("flock pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline =
            context
                .device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some("flock compute pipeline"),
                    layout: Some(&pipeline_layout),
                    module: &module,
                    entry_point: Some("main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    cache: None,
                });

        // Both buffers start from the same seed; the first step reads
        // buffer 0 and writes buffer 1. An empty population still gets
        // one-record buffers so the bind groups are valid, but no
        // dispatch ever runs.
        let record_size = std::mem::size_of::<BoidState>();
        let buffer_size = (seed.len().max(1) * record_size) as u64;
        let buffers = [0, 1].map(|i| {
            context.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("flock buffer {}", i)),
                size: buffer_size,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        });
        if !seed.is_empty() {
            let bytes = bytemuck::cast_slice(seed);
            context.queue.write_buffer(&buffers[0], 0, bytes);
            context.queue.write_buffer(&buffers[1], 0, bytes);
        }

        let params_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("flock params buffer"),
                    contents: bytemuck::bytes_of(&config.to_gpu()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

        // One bind group per read/write ordering, so the swap is just an
        // index flip. The bind groups keep the params buffer alive.
        let bind_groups = [0usize, 1].map(|read| {
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("flock bind group read={}", read)),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers[read].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers[read ^ 1].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        });

        Ok(Self {
            context,
            pipeline,
            buffers,
            bind_groups,
            population,
            read_index: 0,
            config,
        })
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    /// Buffer holding the settled state from the last completed step.
    ///
    /// Valid to bind as a vertex/instance buffer for rendering. The queue
    /// guarantees the swap's producing dispatch finishes before any
    /// subsequently submitted pass reads it.
    pub fn current_buffer(&self) -> &wgpu::Buffer {
        &self.buffers[self.read_index]
    }

    /// Index of the current read buffer (0 or 1). Alternates every step.
    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Advance the simulation by one tick.
    ///
    /// Enqueues one compute dispatch and returns without waiting for it;
    /// queue ordering makes the writes visible to anything submitted
    /// afterwards. The read/write buffer roles swap before returning.
    pub fn step(&mut self) {
        if self.population == 0 {
            return;
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("flock step encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("flock step"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_groups[self.read_index], &[]);
            let groups = (self.population + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE;
            pass.dispatch_workgroups(groups, 1, 1);
        }
        self.context.queue.submit(Some(encoder.finish()));

        // The buffer just written becomes the read side for the next tick
        // and for rendering.
        self.read_index ^= 1;
    }

    /// Copy the current read buffer back to the host.
    ///
    /// Blocks until the copy (and any dispatch ordered before it)
    /// completes.
    pub fn read_state(&self) -> Result<Vec<BoidState>, FlockError> {
        if self.population == 0 {
            return Ok(Vec::new());
        }

        let size = (self.population as usize * std::mem::size_of::<BoidState>()) as u64;
        let staging = self.context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("flock readback buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("flock readback encoder"),
            });
        encoder.copy_buffer_to_buffer(self.current_buffer(), 0, &staging, 0, size);
        self.context.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| FlockError::BufferMapping(e.to_string()))?;
        receiver
            .recv()
            .map_err(|_| FlockError::BufferMapping("map callback dropped".into()))?
            .map_err(|e| FlockError::BufferMapping(e.to_string()))?;

        let data = slice.get_mapped_range();
        let state = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(state)
    }
}

impl FlockEngine for GpuFlock {
    fn step(&mut self) {
        GpuFlock::step(self);
    }

    fn population(&self) -> u32 {
        self.population
    }

    fn current_state(&self) -> Result<Vec<BoidState>, FlockError> {
        self.read_state()
    }
}

impl Drop for GpuFlock {
    fn drop(&mut self) {
        // An already-submitted dispatch may still be in flight; wait for
        // it before the buffers are released. No further dispatches can
        // be submitted once drop has begun.
        let _ = self.context.device.poll(wgpu::PollType::Wait);
    }
}
