//! Mesh construction utilities.
//!
//! Functions for building a [`TriMesh`] from face-vertex lists as found in
//! mesh file formats, and for turning an edited mesh back into a dense list.

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::trimesh::TriMesh;
use crate::error::{MeshError, Result};

/// Build a triangle mesh from vertices and triangle faces.
///
/// Normals are computed from the faces before the mesh is returned.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Example
/// ```
/// use meshrib::mesh::{build_from_triangles, TriMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<TriMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = TriMesh::with_capacity(vertices.len(), faces.len());
    let ids: Vec<VertexId<I>> = vertices.iter().map(|&p| mesh.add_vertex(p)).collect();
    for face in faces {
        mesh.add_triangle([ids[face[0]], ids[face[1]], ids[face[2]]])?;
    }
    mesh.update_normals();

    Ok(mesh)
}

/// Convert a mesh to a dense face-vertex representation.
///
/// Pruned vertex slots and deleted triangles are dropped and the remaining
/// vertices renumbered in slot order. Returns (vertices, faces).
pub fn to_face_vertex<I: MeshIndex>(mesh: &TriMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut remap = vec![usize::MAX; mesh.num_vertex_slots()];
    let mut vertices = Vec::with_capacity(mesh.num_vertices());
    for v in mesh.vertex_ids() {
        remap[v.index()] = vertices.len();
        vertices.push(*mesh.position(v));
    }

    let faces = mesh
        .faces()
        .map(|(_, tri)| tri.map(|v| remap[v.index()]))
        .collect();

    (vertices, faces)
}
