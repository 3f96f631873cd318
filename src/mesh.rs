//! GPU-resident meshes for the primitive shapes.
//!
//! A [`Mesh`] uploads a [`RawGeometry`](crate::geometry::RawGeometry) once
//! and keeps two index buffers: triangles for filled rendering and the
//! deduplicated edge list for wireframe. [`MeshLibrary`] owns one mesh per
//! [`Primitive`] and hands out the right one at draw time; the scene core
//! never touches vertex data.

use wgpu::util::DeviceExt;

use crate::geometry::{self, RawGeometry};
use crate::gpu::GpuContext;
use crate::scene::Primitive;

const CYLINDER_SEGMENTS: u32 = 24;
const SPHERE_SEGMENTS: u32 = 24;
const SPHERE_RINGS: u32 = 12;
const TORUS_SEGMENTS: u32 = 24;
const TORUS_SIDES: u32 = 12;

// Wheel torus: ring + tube = the 0.5 rolling radius the state machine
// assumes when syncing wheel angle to travel.
const TORUS_RING_RADIUS: f32 = 0.35;
const TORUS_TUBE_RADIUS: f32 = 0.15;

/// Vertex format shared by every mesh: position and normal, 24 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex3d {
    /// Buffer layout for pipelines reading this vertex type:
    /// position at location 0, normal at location 1.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// One primitive's geometry on the GPU, drawable filled or as wireframe.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) triangle_index_buffer: wgpu::Buffer,
    pub(crate) triangle_index_count: u32,
    pub(crate) line_index_buffer: wgpu::Buffer,
    pub(crate) line_index_count: u32,
}

impl Mesh {
    /// Uploads raw geometry, deriving the wireframe edge list as it goes.
    pub fn from_geometry(gpu: &GpuContext, geometry: &RawGeometry) -> Self {
        let edges = geometry.edge_indices();

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let triangle_index_buffer =
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Triangle Indices"),
                    contents: bytemuck::cast_slice(&geometry.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

        let line_index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Edge Indices"),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            triangle_index_buffer,
            triangle_index_count: geometry.indices.len() as u32,
            line_index_buffer,
            line_index_count: edges.len() as u32,
        }
    }
}

/// One uploaded mesh per primitive type.
pub struct MeshLibrary {
    cube: Mesh,
    cylinder: Mesh,
    sphere: Mesh,
    torus: Mesh,
}

impl MeshLibrary {
    /// Builds and uploads all four primitives.
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            cube: Mesh::from_geometry(gpu, &geometry::cube()),
            cylinder: Mesh::from_geometry(gpu, &geometry::cylinder(CYLINDER_SEGMENTS)),
            sphere: Mesh::from_geometry(gpu, &geometry::sphere(SPHERE_SEGMENTS, SPHERE_RINGS)),
            torus: Mesh::from_geometry(
                gpu,
                &geometry::torus(
                    TORUS_RING_RADIUS,
                    TORUS_TUBE_RADIUS,
                    TORUS_SEGMENTS,
                    TORUS_SIDES,
                ),
            ),
        }
    }

    /// The mesh backing a scene primitive.
    pub fn get(&self, primitive: Primitive) -> &Mesh {
        match primitive {
            Primitive::Cube => &self.cube,
            Primitive::Cylinder => &self.cylinder,
            Primitive::Sphere => &self.sphere,
            Primitive::Torus => &self.torus,
        }
    }
}
