//! Procedural geometry for the four primitive meshes.
//!
//! Everything here is CPU-side and headless: a [`RawGeometry`] is just
//! vertex and index data, built by the [`cube`], [`cylinder`], [`sphere`],
//! and [`torus`] constructors and uploaded to the GPU by
//! [`Mesh`](crate::mesh::Mesh). The wireframe render mode draws the same
//! vertex buffer through a deduplicated edge list from
//! [`RawGeometry::edge_indices`].
//!
//! Conventions shared by all primitives:
//!
//! - Centered on the origin, unit-ish size (cube side 1, sphere and
//!   cylinder diameter 1), scaled into place by the scene's transforms.
//! - Round primitives have their axis of symmetry along Y.
//! - Counter-clockwise winding for front faces.

use std::collections::HashSet;
use std::f32::consts::TAU;

use crate::mesh::Vertex3d;

/// Vertex and triangle data for one primitive, before GPU upload.
#[derive(Clone, Debug)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Computes the axis-aligned bounding box as `(min, max)` corners.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for vertex in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
        }
        (min, max)
    }

    /// The triangle edges as a deduplicated line list.
    ///
    /// Each undirected edge appears once regardless of how many triangles
    /// share it, so wireframe draws don't overdraw shared edges.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key.0);
                    edges.push(key.1);
                }
            }
        }
        edges
    }
}

/// A unit cube, four vertices per face for flat normals.
pub fn cube() -> RawGeometry {
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // normal, corners in CCW order seen from outside
        ([ 0.0,  0.0,  1.0], [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]]),
        ([ 0.0,  0.0, -1.0], [[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]]),
        ([ 0.0,  1.0,  0.0], [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]]),
        ([ 0.0, -1.0,  0.0], [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]]),
        ([ 1.0,  0.0,  0.0], [[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]]),
        ([-1.0,  0.0,  0.0], [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for corner in corners {
            vertices.push(Vertex3d::new(corner, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    RawGeometry::new(vertices, indices)
}

/// A capped cylinder of radius 0.5 and height 1, axis along Y.
pub fn cylinder(segments: u32) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let radius = 0.5;

    // Side wall: one duplicated seam column so UV-free normals stay clean.
    for seg in 0..=segments {
        let theta = TAU * seg as f32 / segments as f32;
        let (sin, cos) = theta.sin_cos();
        let normal = [cos, 0.0, sin];
        vertices.push(Vertex3d::new([radius * cos, -0.5, radius * sin], normal));
        vertices.push(Vertex3d::new([radius * cos, 0.5, radius * sin], normal));
    }
    for seg in 0..segments {
        let base = seg * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    // Caps, with their own vertices for flat axial normals.
    for (y, normal_y) in [(0.5, 1.0), (-0.5, -1.0f32)] {
        let center = vertices.len() as u32;
        vertices.push(Vertex3d::new([0.0, y, 0.0], [0.0, normal_y, 0.0]));
        let ring = vertices.len() as u32;
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex3d::new(
                [radius * cos, y, radius * sin],
                [0.0, normal_y, 0.0],
            ));
        }
        for seg in 0..segments {
            if normal_y > 0.0 {
                indices.extend_from_slice(&[center, ring + seg + 1, ring + seg]);
            } else {
                indices.extend_from_slice(&[center, ring + seg, ring + seg + 1]);
            }
        }
    }

    RawGeometry::new(vertices, indices)
}

/// A UV sphere of radius 0.5 with latitude/longitude subdivision.
pub fn sphere(segments: u32, rings: u32) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();
            vertices.push(Vertex3d::new([x * 0.5, y * 0.5, z * 0.5], [x, y, z]));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[next, current + 1, next + 1]);
        }
    }

    RawGeometry::new(vertices, indices)
}

/// A torus with its axis along Y: flat on the ground until the scene
/// stands it up.
///
/// `ring_radius` is the distance from the axis to the tube center;
/// `tube_radius` is the tube's own radius, so the outer radius is their sum.
pub fn torus(ring_radius: f32, tube_radius: f32, segments: u32, sides: u32) -> RawGeometry {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for seg in 0..=segments {
        let theta = TAU * seg as f32 / segments as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for side in 0..=sides {
            let phi = TAU * side as f32 / sides as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let radial = ring_radius + tube_radius * cos_p;
            vertices.push(Vertex3d::new(
                [radial * cos_t, tube_radius * sin_p, radial * sin_t],
                [cos_p * cos_t, sin_p, cos_p * sin_t],
            ));
        }
    }

    for seg in 0..segments {
        for side in 0..sides {
            let current = seg * (sides + 1) + side;
            let next = current + sides + 1;
            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[next, current + 1, next + 1]);
        }
    }

    RawGeometry::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_counts_and_bounds() {
        let geom = cube();
        assert_eq!(geom.vertices.len(), 24);
        assert_eq!(geom.indices.len(), 36);

        let (min, max) = geom.bounds();
        assert_eq!(min, [-0.5, -0.5, -0.5]);
        assert_eq!(max, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn cube_edges_deduplicate() {
        // Per face: 4 border edges + 1 diagonal, faces share no vertices.
        let edges = cube().edge_indices();
        assert_eq!(edges.len(), 6 * 5 * 2);
    }

    #[test]
    fn sphere_counts_follow_tessellation() {
        let segments = 16;
        let rings = 8;
        let geom = sphere(segments, rings);
        assert_eq!(geom.vertices.len(), ((segments + 1) * (rings + 1)) as usize);
        assert_eq!(geom.indices.len(), (segments * rings * 6) as usize);
    }

    #[test]
    fn sphere_vertices_sit_on_the_surface() {
        for vertex in sphere(12, 6).vertices {
            let [x, y, z] = vertex.position;
            let radius = (x * x + y * y + z * z).sqrt();
            assert!((radius - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn cylinder_bounds() {
        let (min, max) = cylinder(24).bounds();
        assert!((min[1] + 0.5).abs() < 1e-6);
        assert!((max[1] - 0.5).abs() < 1e-6);
        assert!((max[0] - 0.5).abs() < 1e-5);
        assert!((min[2] + 0.5).abs() < 1e-5);
    }

    #[test]
    fn torus_outer_radius_is_ring_plus_tube() {
        let geom = torus(0.35, 0.15, 24, 12);
        let (min, max) = geom.bounds();
        assert!((max[0] - 0.5).abs() < 1e-5);
        assert!((min[0] + 0.5).abs() < 1e-5);
        assert!((max[1] - 0.15).abs() < 1e-5);
    }

    #[test]
    fn torus_normals_are_unit_length() {
        for vertex in torus(0.35, 0.15, 8, 6).vertices {
            let [x, y, z] = vertex.normal;
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn edge_lists_pair_up() {
        for geom in [cube(), cylinder(12), sphere(8, 4), torus(0.35, 0.15, 8, 4)] {
            let edges = geom.edge_indices();
            assert_eq!(edges.len() % 2, 0);
            let max_index = geom.vertices.len() as u32;
            assert!(edges.iter().all(|&i| i < max_index));
        }
    }
}
