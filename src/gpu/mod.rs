mod shader;

pub use shader::{FRAGMENT_ENTRY, ShaderDesc, VERTEX_ENTRY, validated};

use crate::math::Mat3;
use crate::programs::ProgramBuffers;
use wgpu::util::DeviceExt;

/// Camera state for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Graph coordinates to clip space.
    pub matrix: Mat3,
    /// Camera zoom ratio, above 1 when zoomed out.
    pub ratio: f32,
    /// Graph units per pixel at ratio 1.
    pub correction_ratio: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EdgeUniforms {
    matrix: [[f32; 4]; 3],
    sqrt_zoom_ratio: f32,
    correction_ratio: f32,
    _padding: [f32; 2],
}

impl From<&RenderParams> for EdgeUniforms {
    fn from(params: &RenderParams) -> Self {
        Self {
            matrix: params.matrix.to_padded_columns(),
            sqrt_zoom_ratio: params.ratio.max(0.0).sqrt(),
            correction_ratio: params.correction_ratio,
            _padding: [0.0; 2],
        }
    }
}

/// GPU half of an edge program: pipeline, uniforms and the uploaded buffers.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex: Option<wgpu::Buffer>,
    index: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl GpuProgram {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        desc: &ShaderDesc,
        vertex_layout: wgpu::VertexBufferLayout<'static>,
    ) -> anyhow::Result<Self> {
        let uniforms = EdgeUniforms::from(&RenderParams {
            matrix: Mat3::identity(),
            ratio: 1.0,
            correction_ratio: 1.0,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Edge Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("edge_uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("edge_uniform_bind_group"),
        });

        let pipeline = validated(device, desc.label, || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Edge Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[vertex_layout],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        })?;

        log::info!("{}: pipeline ready", desc.label);

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex: None,
            index: None,
            vertex_count: 0,
            index_count: 0,
        })
    }

    /// Uploads the current CPU-side arrays.
    pub fn buffer_data(&mut self, device: &wgpu::Device, buffers: &ProgramBuffers) {
        if buffers.vertex_array.is_empty() {
            self.vertex = None;
            self.index = None;
            self.vertex_count = 0;
            self.index_count = 0;
            return;
        }

        self.vertex = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Edge Vertex Buffer"),
            contents: bytemuck::cast_slice(&buffers.vertex_array),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.vertex_count = buffers.vertex_count() as u32;

        if buffers.indices_array.is_empty() {
            self.index = None;
            self.index_count = 0;
        } else {
            self.index = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Edge Index Buffer"),
                contents: bytemuck::cast_slice(&buffers.indices_array),
                usage: wgpu::BufferUsages::INDEX,
            }));
            self.index_count = buffers.indices_array.len() as u32;
        }
    }

    pub fn render(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>, params: &RenderParams) {
        let Some(vertex) = &self.vertex else {
            return;
        };

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[EdgeUniforms::from(params)]),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, vertex.slice(..));

        match &self.index {
            Some(index) => {
                pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => pass.draw(0..self.vertex_count, 0..1),
        }
    }
}
