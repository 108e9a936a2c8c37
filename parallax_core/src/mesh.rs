// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessellation of [`Geometry`] descriptors into indexed triangle meshes.
//!
//! Vertices carry a position and a unit normal and are laid out for direct
//! upload ([`MeshVertex`] is `Pod`). Smooth surfaces share vertices along a
//! seam-duplicated grid; flat-shaded surfaces give every triangle its own
//! three vertices so each face can carry its own normal.
//!
//! Segment counts are clamped to [`MAX_SEGMENTS`] and subdivision to
//! [`MAX_ICOSAHEDRON_DETAIL`], so an unvalidated [`Geometry`] still yields a
//! bounded mesh.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::{Geometry, MAX_ICOSAHEDRON_DETAIL, MAX_SEGMENTS};

/// One vertex: position and normal, both in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
}

/// An indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Three indices per triangle, counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replaces shared vertices with per-triangle copies carrying the face
    /// normal.
    #[must_use]
    pub fn into_flat_shaded(self) -> Self {
        let mut vertices = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| self.vertices[i as usize].position);
            let normal = to_f32(face_normal(to_f64(a), to_f64(b), to_f64(c)));
            for position in [a, b, c] {
                vertices.push(MeshVertex { position, normal });
            }
        }
        let indices = (0..index(vertices.len())).collect();
        Self { vertices, indices }
    }
}

impl Geometry {
    /// Tessellates the surface with smooth normals.
    #[must_use]
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Self::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments, tubular_segments),
            Self::Icosahedron { radius, detail } => icosahedron(radius, detail),
        }
    }
}

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(a: Vec3) -> Vec3 {
    let len = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();
    if len > 0.0 { scale(a, 1.0 / len) } else { a }
}

fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    normalize(cross(sub(b, a), sub(c, a)))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "vertex data is uploaded as single precision"
)]
fn to_f32(v: Vec3) -> [f32; 3] {
    v.map(|c| c as f32)
}

fn to_f64(v: [f32; 3]) -> Vec3 {
    v.map(f64::from)
}

fn vertex(position: Vec3, normal: Vec3) -> MeshVertex {
    MeshVertex {
        position: to_f32(position),
        normal: to_f32(normal),
    }
}

fn index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

/// Emits the two triangles of every quad in a `(cols + 1) × (rows + 1)`
/// vertex grid.
fn grid_indices(rows: u32, cols: u32, indices: &mut Vec<u32>) {
    let stride = cols + 1;
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

fn torus_knot_curve(u: f64, p: f64, q: f64, radius: f64) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    [
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    ]
}

fn torus_knot(radius: f64, tube: f64, tubular: u32, radial: u32, p: u32, q: u32) -> MeshData {
    let (tubular, radial) = (tubular.min(MAX_SEGMENTS), radial.min(MAX_SEGMENTS));
    let (pf, qf) = (f64::from(p), f64::from(q));
    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
    for i in 0..=tubular {
        let u = f64::from(i) / f64::from(tubular) * pf * TAU;
        let p1 = torus_knot_curve(u, pf, qf, radius);
        let p2 = torus_knot_curve(u + 0.01, pf, qf, radius);

        // Frenet-like frame around the curve.
        let t = sub(p2, p1);
        let n = add(p2, p1);
        let b = normalize(cross(t, n));
        let n = normalize(cross(b, t));

        for j in 0..=radial {
            let v = f64::from(j) / f64::from(radial) * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = add(p1, add(scale(n, cx), scale(b, cy)));
            vertices.push(vertex(pos, normalize(sub(pos, p1))));
        }
    }
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    grid_indices(tubular, radial, &mut indices);
    MeshData { vertices, indices }
}

fn torus(radius: f64, tube: f64, radial: u32, tubular: u32) -> MeshData {
    let (tubular, radial) = (tubular.min(MAX_SEGMENTS), radial.min(MAX_SEGMENTS));
    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
    for j in 0..=radial {
        let v = f64::from(j) / f64::from(radial) * TAU;
        for i in 0..=tubular {
            let u = f64::from(i) / f64::from(tubular) * TAU;
            let ring = radius + tube * v.cos();
            let pos = [ring * u.cos(), ring * u.sin(), tube * v.sin()];
            let centre = [radius * u.cos(), radius * u.sin(), 0.0];
            vertices.push(vertex(pos, normalize(sub(pos, centre))));
        }
    }
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    grid_indices(radial, tubular, &mut indices);
    // The ring grid winds the other way round.
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
    MeshData { vertices, indices }
}

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

const ICOSAHEDRON_VERTICES: [Vec3; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Icosphere faces on the unit sphere; vertices are not shared.
fn icosahedron_faces(detail: u32) -> Vec<[Vec3; 3]> {
    let mut faces: Vec<[Vec3; 3]> = ICOSAHEDRON_FACES
        .iter()
        .map(|f| f.map(|i| normalize(ICOSAHEDRON_VERTICES[i])))
        .collect();
    for _ in 0..detail {
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = normalize(scale(add(a, b), 0.5));
            let bc = normalize(scale(add(b, c), 0.5));
            let ca = normalize(scale(add(c, a), 0.5));
            next.extend_from_slice(&[[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]);
        }
        faces = next;
    }
    faces
}

fn icosahedron(radius: f64, detail: u32) -> MeshData {
    let faces = icosahedron_faces(detail.min(MAX_ICOSAHEDRON_DETAIL));
    let mut vertices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        for corner in face {
            vertices.push(vertex(scale(corner, radius), corner));
        }
    }
    let indices = (0..index(vertices.len())).collect();
    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len_sq(v: [f32; 3]) -> f32 {
        v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
    }

    fn assert_well_formed(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0, "partial triangle");
        let n = mesh.vertices.len();
        assert!(
            mesh.indices.iter().all(|&i| (i as usize) < n),
            "index out of range"
        );
        for v in &mesh.vertices {
            assert!(
                (len_sq(v.normal) - 1.0).abs() < 1e-4,
                "normal not unit length: {v:?}"
            );
        }
    }

    #[test]
    fn torus_knot_grid_counts() {
        let mesh = Geometry::TorusKnot {
            radius: 1.05,
            tube: 0.32,
            tubular_segments: 220,
            radial_segments: 32,
            p: 2,
            q: 3,
        }
        .tessellate();
        assert_eq!(mesh.vertices.len(), 221 * 33);
        assert_eq!(mesh.triangle_count(), 220 * 32 * 2);
        assert_well_formed(&mesh);
    }

    #[test]
    fn torus_grid_counts_and_extent() {
        let mesh = Geometry::Torus {
            radius: 1.0,
            tube: 0.25,
            radial_segments: 8,
            tubular_segments: 16,
        }
        .tessellate();
        assert_eq!(mesh.vertices.len(), 9 * 17);
        assert_eq!(mesh.triangle_count(), 8 * 16 * 2);
        assert_well_formed(&mesh);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let planar = x * x + y * y;
            assert!(planar <= 1.25 * 1.25 + 1e-4 && planar >= 0.75 * 0.75 - 1e-4);
            assert!(z.abs() <= 0.25 + 1e-6);
        }
    }

    #[test]
    fn icosahedron_vertices_lie_on_the_sphere() {
        for detail in 0..3 {
            let mesh = Geometry::Icosahedron {
                radius: 2.0,
                detail,
            }
            .tessellate();
            assert_eq!(mesh.triangle_count(), 20 * 4_usize.pow(detail));
            assert_well_formed(&mesh);
            for v in &mesh.vertices {
                assert!((len_sq(v.position) - 4.0).abs() < 1e-4, "{v:?}");
            }
        }
    }

    #[test]
    fn flat_shading_gives_each_triangle_its_own_vertices() {
        let smooth = Geometry::Torus {
            radius: 1.0,
            tube: 0.3,
            radial_segments: 4,
            tubular_segments: 6,
        }
        .tessellate();
        let triangles = smooth.triangle_count();
        let flat = smooth.into_flat_shaded();
        assert_eq!(flat.vertices.len(), triangles * 3);
        assert_eq!(flat.triangle_count(), triangles);
        assert_well_formed(&flat);
        for tri in flat.vertices.chunks_exact(3) {
            assert_eq!(tri[0].normal, tri[1].normal);
            assert_eq!(tri[1].normal, tri[2].normal);
        }
    }

    #[test]
    fn oversized_segment_counts_are_clamped() {
        let mesh = Geometry::TorusKnot {
            radius: 1.0,
            tube: 0.3,
            tubular_segments: u32::MAX,
            radial_segments: 3,
            p: 2,
            q: 3,
        }
        .tessellate();
        let max = MAX_SEGMENTS as usize;
        assert_eq!(mesh.vertices.len(), (max + 1) * 4);
        assert_eq!(mesh.triangle_count(), max * 3 * 2);
        assert_well_formed(&mesh);

        let mesh = Geometry::Torus {
            radius: 1.0,
            tube: 0.3,
            radial_segments: 3,
            tubular_segments: u32::MAX,
        }
        .tessellate();
        assert_eq!(mesh.vertices.len(), 4 * (max + 1));
        assert_well_formed(&mesh);
    }

    #[test]
    fn oversized_detail_is_clamped() {
        let mesh = Geometry::Icosahedron {
            radius: 1.0,
            detail: u32::MAX,
        }
        .tessellate();
        assert_eq!(mesh.triangle_count(), 20 * 4_usize.pow(MAX_ICOSAHEDRON_DETAIL));
    }

    #[test]
    fn vertices_cast_to_bytes() {
        let v = [MeshVertex::default(); 2];
        assert_eq!(bytemuck::cast_slice::<MeshVertex, u8>(&v).len(), 48);
    }
}
