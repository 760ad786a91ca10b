//! Test meshes shared by the unit tests.

use std::f64::consts::TAU;

use nalgebra::Point3;

use super::{build_from_triangles, TriMesh, VertexId};

/// Flat `n x n` grid in the z = 0 plane with normals along +z.
///
/// Vertex `(i, j)` has id `j * (n + 1) + i` and sits at `(i, j, 0)`.
pub fn grid_mesh(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

/// Id of grid vertex `(i, j)` in [`grid_mesh`]`(n)`.
pub fn grid_vertex(n: usize, i: usize, j: usize) -> VertexId {
    VertexId::new(j * (n + 1) + i)
}

fn tube_geometry(rings: usize, segments: usize, radius: f64) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity(rings * segments);
    let mut faces = Vec::new();

    for j in 0..rings {
        for i in 0..segments {
            let theta = TAU * i as f64 / segments as f64;
            vertices.push(Point3::new(radius * theta.cos(), radius * theta.sin(), j as f64));
        }
    }

    for j in 0..rings - 1 {
        for i in 0..segments {
            let a = j * segments + i;
            let b = j * segments + (i + 1) % segments;
            let c = (j + 1) * segments + (i + 1) % segments;
            let d = (j + 1) * segments + i;
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }

    (vertices, faces)
}

/// Open cylinder along +z with outward normals; ring `j` lies at z = j.
pub fn tube_mesh(rings: usize, segments: usize, radius: f64) -> TriMesh {
    let (vertices, faces) = tube_geometry(rings, segments, radius);
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Closed cylinder: [`tube_mesh`] with a triangle fan on each end.
pub fn capped_tube_mesh(rings: usize, segments: usize, radius: f64) -> TriMesh {
    let (mut vertices, mut faces) = tube_geometry(rings, segments, radius);

    let bottom = vertices.len();
    vertices.push(Point3::new(0.0, 0.0, 0.0));
    let top = vertices.len();
    vertices.push(Point3::new(0.0, 0.0, (rings - 1) as f64));

    let last = (rings - 1) * segments;
    for i in 0..segments {
        let next = (i + 1) % segments;
        faces.push([bottom, next, i]);
        faces.push([top, last + i, last + next]);
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

/// Vertex ids of ring `j` of a tube built with `segments` segments.
pub fn ring(j: usize, segments: usize) -> Vec<VertexId> {
    (0..segments).map(|i| VertexId::new(j * segments + i)).collect()
}
