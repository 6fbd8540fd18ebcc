//! GPU resources for one installed point cloud.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{GpuState, DEPTH_FORMAT};
use crate::generator::PointCloudBuffers;
use crate::scene::PointCloudHost;
use crate::visuals::PointsMaterial;

pub(crate) const POINTS_SHADER: &str = include_str!("points.wgsl");

/// Corners of the quad drawn for each particle.
const VERTICES_PER_POINT: u32 = 6;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

/// Per-cloud material uniforms (group 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub size: f32,
    pub size_attenuation: u32,
    pub vertex_colors: u32,
    pub _padding: f32,
}

impl From<&PointsMaterial> for MaterialUniforms {
    fn from(material: &PointsMaterial) -> Self {
        Self {
            size: material.size,
            size_attenuation: material.size_attenuation as u32,
            vertex_colors: material.vertex_colors as u32,
            _padding: 0.0,
        }
    }
}

/// An installed point cloud: its vertex buffers, material and pipeline.
pub struct GpuPointCloud {
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    count: u32,
}

impl GpuPointCloud {
    fn new(gpu: &GpuState, buffers: &PointCloudBuffers, material: &PointsMaterial) -> Self {
        let device = &gpu.device;

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Positions"),
            contents: bytemuck::cast_slice(&buffers.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Colors"),
            contents: bytemuck::cast_slice(&buffers.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = MaterialUniforms::from(material);
        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Material"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points Material Bind Group"),
            layout: &gpu.material_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        let pipeline = create_pipeline(gpu, material);

        Self {
            position_buffer,
            color_buffer,
            material_buffer,
            material_bind_group,
            pipeline,
            count: buffers.len() as u32,
        }
    }

    /// Record the draw with `uniforms` bound as the frame uniforms.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, uniforms: &wgpu::BindGroup) {
        // Empty buffer slices are invalid
        if self.count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, uniforms, &[]);
        render_pass.set_bind_group(1, &self.material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.draw(0..VERTICES_PER_POINT, 0..self.count);
    }

    /// Free the GPU memory backing this cloud.
    pub fn destroy(self) {
        self.position_buffer.destroy();
        self.color_buffer.destroy();
        self.material_buffer.destroy();
    }
}

fn create_pipeline(gpu: &GpuState, material: &PointsMaterial) -> wgpu::RenderPipeline {
    let device = &gpu.device;

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Points Pipeline Layout"),
        bind_group_layouts: &[&gpu.uniform_bind_group_layout, &gpu.material_bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Points Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &gpu.points_shader,
            entry_point: Some("vs_main"),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &POSITION_ATTRIBUTES,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &COLOR_ATTRIBUTES,
                },
            ],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &gpu.points_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.config.format,
                blend: Some(material.blend_mode.to_blend_state()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: material.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl PointCloudHost for GpuState {
    type Resource = GpuPointCloud;

    fn install_point_cloud(
        &mut self,
        buffers: &PointCloudBuffers,
        material: &PointsMaterial,
    ) -> GpuPointCloud {
        let cloud = GpuPointCloud::new(self, buffers, material);
        log::debug!("Uploaded {} points to the GPU", cloud.count);
        cloud
    }

    fn release_point_cloud(&mut self, resource: GpuPointCloud) {
        resource.destroy();
    }
}
