//! The render pass that turns resolved draws into GPU work.
//!
//! [`ScenePass`] owns two pipelines over the same flat-color shader: a
//! triangle-list pipeline for filled rendering and a line-list pipeline for
//! wireframe, matching the scene's global [`RenderMode`]. Per-frame state
//! is the projection matrix (group 0); per-draw state is the model-view
//! matrix and flat color, packed into one uniform buffer and selected with
//! dynamic offsets (group 1).
//!
//! Call [`prepare`](ScenePass::prepare) with the frame's draw list before
//! opening the render pass (it may grow the uniform buffer), then
//! [`render`](ScenePass::render) inside it.

use glam::Mat4;

use crate::gpu::GpuContext;
use crate::mesh::{MeshLibrary, Vertex3d};
use crate::scene::ResolvedDraw;
use crate::state::RenderMode;

/// Per-frame uniforms: the projection matrix.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    projection: [[f32; 4]; 4],
}

/// Per-draw uniforms: model-view matrix and flat color.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model_view: [[f32; 4]; 4],
    color: [f32; 4],
}

// Dynamic-offset stride; 256 is the universal minimum uniform alignment.
const OBJECT_STRIDE: u64 = 256;

pub struct ScenePass {
    filled_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    object_capacity: u32,
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Bind Group Layout"),
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
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ObjectUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let object_capacity = 512;
        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(device, &object_bind_group_layout, object_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, topology, cull_mode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let filled_pipeline = make_pipeline(
            "Scene Filled Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
        );
        let wireframe_pipeline = make_pipeline(
            "Scene Wireframe Pipeline",
            wgpu::PrimitiveTopology::LineList,
            None,
        );

        let (depth_view, depth_size) = Self::create_depth_view(gpu);

        Self {
            filled_pipeline,
            wireframe_pipeline,
            frame_buffer,
            frame_bind_group,
            object_buffer,
            object_bind_group,
            object_bind_group_layout,
            object_capacity,
            depth_view,
            depth_size,
        }
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniforms"),
            size: capacity as u64 * OBJECT_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> (wgpu::TextureView, (u32, u32)) {
        let (width, height) = gpu.size();
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (view, (width, height))
    }

    /// Uploads the frame's uniforms, growing the per-draw buffer and
    /// recreating the depth buffer if the window changed size. Must run
    /// before the render pass opens.
    pub fn prepare(&mut self, gpu: &GpuContext, projection: Mat4, draws: &[ResolvedDraw]) {
        if self.depth_size != gpu.size() {
            let (view, size) = Self::create_depth_view(gpu);
            self.depth_view = view;
            self.depth_size = size;
        }

        if draws.len() as u32 > self.object_capacity {
            self.object_capacity = (draws.len() as u32).next_power_of_two();
            let (buffer, bind_group) = Self::create_object_buffer(
                &gpu.device,
                &self.object_bind_group_layout,
                self.object_capacity,
            );
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
        }

        let frame = FrameUniforms {
            projection: projection.to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));

        let mut packed = vec![0u8; draws.len() * OBJECT_STRIDE as usize];
        for (i, draw) in draws.iter().enumerate() {
            let object = ObjectUniforms {
                model_view: draw.model_view.to_cols_array_2d(),
                color: [draw.color.r, draw.color.g, draw.color.b, draw.color.a],
            };
            let offset = i * OBJECT_STRIDE as usize;
            packed[offset..offset + std::mem::size_of::<ObjectUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&object));
        }
        if !packed.is_empty() {
            gpu.queue.write_buffer(&self.object_buffer, 0, &packed);
        }
    }

    /// Issues one indexed draw per resolved leaf, in list order.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass,
        meshes: &MeshLibrary,
        mode: RenderMode,
        draws: &[ResolvedDraw],
    ) {
        if draws.is_empty() {
            return;
        }

        let pipeline = match mode {
            RenderMode::Filled => &self.filled_pipeline,
            RenderMode::Wireframe => &self.wireframe_pipeline,
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (i, draw) in draws.iter().enumerate() {
            let mesh = meshes.get(draw.primitive);
            let offset = i as u32 * OBJECT_STRIDE as u32;
            render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            match mode {
                RenderMode::Filled => {
                    render_pass.set_index_buffer(
                        mesh.triangle_index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..mesh.triangle_index_count, 0, 0..1);
                }
                RenderMode::Wireframe => {
                    render_pass.set_index_buffer(
                        mesh.line_index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..mesh.line_index_count, 0, 0..1);
                }
            }
        }
    }
}
