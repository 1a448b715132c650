//! Snowflake rendering pipeline.
//!
//! One shader program, one quad vertex buffer and one uniform block; every
//! frame rewrites the uniforms and draws the quad across the whole target.

use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, CommandEncoder, Device, Queue, RenderPipeline,
    TextureFormat, TextureView,
};

use super::layouts::create_snowflake_layout;
use super::pipelines::{create_pipeline_layout, RenderPipelineBuilder};
use crate::params::{Palette, SnowflakeParams};

/// Uniform data passed to shaders.
///
/// Field order and padding match the `Uniforms` block in `snowflake.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SnowflakeUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub seed: f32,
    pub complexity: f32,
    pub thickness: f32,
    pub glow: f32,
    pub _padding0: f32,
    pub mouse: [f32; 2],
    pub _padding1: [f32; 2],
    pub base_color: [f32; 4],  // rgb + unused alpha (vec4 for alignment)
    pub glow_color: [f32; 4],
}

impl SnowflakeUniforms {
    /// Pack the current parameters for upload.
    pub fn new(params: &SnowflakeParams, palette: &Palette, resolution: [f32; 2], time: f32) -> Self {
        let [br, bg, bb] = palette.base;
        let [gr, gg, gb] = palette.glow;
        Self {
            resolution,
            time,
            seed: params.seed,
            complexity: params.complexity,
            thickness: params.thickness,
            glow: params.glow,
            _padding0: 0.0,
            mouse: params.mouse,
            _padding1: [0.0; 2],
            base_color: [br, bg, bb, 1.0],
            glow_color: [gr, gg, gb, 1.0],
        }
    }
}

/// Corner of the full-screen quad in clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

/// Triangle-strip quad covering clip space.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
];

/// Snowflake rendering pipeline.
pub struct SnowflakePipeline {
    pub pipeline: RenderPipeline,
    pub bind_group_layout: BindGroupLayout,
    pub uniform_buffer: Buffer,
    pub vertex_buffer: Buffer,
}

impl SnowflakePipeline {
    /// Create a new snowflake pipeline targeting `format`.
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("snowflake_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/snowflake.wgsl").into()),
        });

        let bind_group_layout = create_snowflake_layout(device);
        let pipeline_layout =
            create_pipeline_layout(device, "snowflake_pipeline_layout", &[&bind_group_layout]);

        let pipeline = RenderPipelineBuilder::new("snowflake_pipeline", &shader)
            .layout(&pipeline_layout)
            .vertex_buffers(vec![wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            }])
            .format(format)
            .build(device);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("snowflake_uniforms"),
            size: std::mem::size_of::<SnowflakeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("snowflake_quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            vertex_buffer,
        }
    }

    /// Create a bind group for this pipeline.
    pub fn create_bind_group(&self, device: &Device) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("snowflake_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.uniform_buffer.as_entire_binding(),
            }],
        })
    }

    /// Upload the uniforms for the next draw.
    pub fn write_uniforms(&self, queue: &Queue, uniforms: &SnowflakeUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the full-screen pass into `encoder`.
    pub fn draw(
        &self,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        bind_group: &BindGroup,
        background: [f32; 3],
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("snowflake_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background[0] as f64,
                        g: background[1] as f64,
                        b: background[2] as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}
