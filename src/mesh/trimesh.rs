//! Mutable indexed triangle mesh.
//!
//! [`TriMesh`] is the representation the ribbon engine edits in place. It is a
//! plain vertex/triangle table rather than a half-edge structure because the
//! engine deletes and inserts triangles freely, and may briefly produce
//! non-manifold configurations (for example a zero-width ribbon glued onto a
//! single ring of vertices).
//!
//! # Stable ids
//!
//! Removing a triangle or an isolated vertex tombstones its slot. Other ids are
//! never renumbered, so curves expressed as vertex ids remain valid across an
//! edit. [`to_face_vertex`](super::to_face_vertex) compacts a mesh when a
//! dense representation is needed (for example when saving).

use std::collections::HashMap;

use nalgebra::{Point3, Vector2, Vector3};

use super::index::{FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Length below which a vector is treated as zero.
pub(crate) const DEGENERATE_EPS: f64 = 1e-12;

/// A vertex record.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Unit normal, or zero if it could not be estimated.
    pub normal: Vector3<f64>,

    /// Optional RGB color.
    pub color: Option<Vector3<f64>>,

    /// Optional texture coordinate.
    pub texcoord: Option<Vector2<f64>>,
}

impl Vertex {
    /// Create a new vertex at the given position with no attributes.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            color: None,
            texcoord: None,
        }
    }

    /// Create a vertex at `position` carrying the attributes of `self`.
    pub fn with_position(&self, position: Point3<f64>) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

/// An indexed triangle mesh with stable, tombstoned ids.
#[derive(Debug, Clone)]
pub struct TriMesh<I: MeshIndex = u32> {
    vertices: Vec<Vertex>,
    vertex_live: Vec<bool>,
    faces: Vec<Option<[VertexId<I>; 3]>>,
    live_vertices: usize,
    live_faces: usize,
}

impl<I: MeshIndex> Default for TriMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> TriMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            vertex_live: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
            live_vertices: 0,
            live_faces: 0,
        }
    }

    // ==================== Accessors ====================

    /// Number of live vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.live_vertices
    }

    /// Number of vertex slots, including pruned ones.
    ///
    /// Every id ever handed out is below this bound.
    #[inline]
    pub fn num_vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Number of triangle slots, including deleted ones.
    #[inline]
    pub fn num_face_slots(&self) -> usize {
        self.faces.len()
    }

    /// Whether `v` names a live vertex.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId<I>) -> bool {
        v.is_valid() && self.vertex_live.get(v.index()).copied().unwrap_or(false)
    }

    /// Get a vertex record by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex record by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Get the stored normal of a vertex.
    #[inline]
    pub fn normal(&self, v: VertexId<I>) -> &Vector3<f64> {
        &self.vertex(v).normal
    }

    /// Get the three vertices of a live triangle.
    #[inline]
    pub fn face(&self, f: FaceId<I>) -> Option<[VertexId<I>; 3]> {
        self.faces.get(f.index()).copied().flatten()
    }

    /// Iterate over live vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| VertexId::new(i))
    }

    /// Iterate over live triangle IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().map(|(f, _)| f)
    }

    /// Iterate over live triangles with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, [VertexId<I>; 3])> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.map(|tri| (FaceId::new(i), tri)))
    }

    /// Get the positions of the three vertices of a triangle.
    pub fn face_positions(&self, f: FaceId<I>) -> Option<[Point3<f64>; 3]> {
        let [v0, v1, v2] = self.face(f)?;
        Some([*self.position(v0), *self.position(v1), *self.position(v2)])
    }

    // ==================== Geometry ====================

    /// Unit normal of a triangle, `None` for deleted or degenerate triangles.
    pub fn face_normal(&self, f: FaceId<I>) -> Option<Vector3<f64>> {
        let [p0, p1, p2] = self.face_positions(f)?;
        (p1 - p0).cross(&(p2 - p0)).try_normalize(DEGENERATE_EPS)
    }

    /// Area of a triangle (zero for deleted triangles).
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        self.face_positions(f)
            .map(|[p0, p1, p2]| 0.5 * (p1 - p0).cross(&(p2 - p0)).norm())
            .unwrap_or(0.0)
    }

    /// Total surface area of the live triangles.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Bounding box of the live vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut ids = self.vertex_ids();
        let first = *self.position(ids.next()?);
        let (mut min, mut max) = (first, first);
        for v in ids {
            let p = self.position(v);
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    /// Recompute area-weighted vertex normals from the live triangles.
    ///
    /// Vertices without a non-degenerate incident triangle get a zero normal.
    pub fn update_normals(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.vertices.len()];
        for tri in self.faces.iter().flatten() {
            let [p0, p1, p2] = tri.map(|v| self.vertices[v.index()].position);
            let n = (p1 - p0).cross(&(p2 - p0));
            for v in tri {
                accum[v.index()] += n;
            }
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.try_normalize(DEGENERATE_EPS).unwrap_or_else(Vector3::zeros);
        }
    }

    // ==================== Editing ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        self.add_vertex_record(Vertex::new(position))
    }

    /// Add a new vertex with all of its attributes and return its ID.
    pub fn add_vertex_record(&mut self, vertex: Vertex) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(vertex);
        self.vertex_live.push(true);
        self.live_vertices += 1;
        id
    }

    /// Add a triangle and return its ID.
    ///
    /// Fails if a vertex is not live or the triangle repeats a vertex.
    pub fn add_triangle(&mut self, tri: [VertexId<I>; 3]) -> Result<FaceId<I>> {
        let face = self.faces.len();
        for v in tri {
            if !self.contains_vertex(v) {
                return Err(MeshError::InvalidVertexIndex {
                    face,
                    vertex: v.index(),
                });
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(MeshError::DegenerateFace { face });
        }
        self.faces.push(Some(tri));
        self.live_faces += 1;
        Ok(FaceId::new(face))
    }

    /// Delete a set of triangles.
    ///
    /// All ids are checked before anything is removed, so a stale id leaves
    /// the mesh unchanged. Duplicate ids in `faces` are deleted once.
    pub fn delete_triangles(&mut self, faces: &[FaceId<I>]) -> Result<usize> {
        for &f in faces {
            if self.face(f).is_none() {
                return Err(MeshError::StaleFace { face: f.index() });
            }
        }
        let mut removed = 0;
        for &f in faces {
            if self.faces[f.index()].take().is_some() {
                removed += 1;
            }
        }
        self.live_faces -= removed;
        Ok(removed)
    }

    /// Remove vertices no live triangle references. Returns how many were removed.
    pub fn remove_isolated_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for tri in self.faces.iter().flatten() {
            for v in tri {
                used[v.index()] = true;
            }
        }
        let mut removed = 0;
        for (live, used) in self.vertex_live.iter_mut().zip(used) {
            if *live && !used {
                *live = false;
                removed += 1;
            }
        }
        self.live_vertices -= removed;
        removed
    }

    // ==================== Topology ====================

    /// Count incident live triangles per undirected edge, keyed `(min, max)`.
    pub fn edge_face_counts(&self) -> HashMap<(usize, usize), usize> {
        let mut counts = HashMap::new();
        for tri in self.faces.iter().flatten() {
            for k in 0..3 {
                let a = tri[k].index();
                let b = tri[(k + 1) % 3].index();
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Undirected edges with exactly one incident triangle.
    pub fn boundary_edges(&self) -> Vec<(VertexId<I>, VertexId<I>)> {
        let mut edges: Vec<_> = self
            .edge_face_counts()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|((a, b), _)| (VertexId::new(a), VertexId::new(b)))
            .collect();
        edges.sort();
        edges
    }

    /// Directed half-edges `(from, to)` used by live triangles.
    pub fn directed_edges(&self) -> impl Iterator<Item = (VertexId<I>, VertexId<I>)> + '_ {
        self.faces
            .iter()
            .flatten()
            .flat_map(|tri| (0..3).map(move |k| (tri[k], tri[(k + 1) % 3])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriMesh {
        let mut mesh = TriMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle([a, b, c]).unwrap();
        mesh.add_triangle([a, c, d]).unwrap();
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TriMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_add_triangle_rejects_bad_input() {
        let mut mesh = quad();
        let a = VertexId::new(0);
        assert!(matches!(
            mesh.add_triangle([a, a, VertexId::new(1)]),
            Err(MeshError::DegenerateFace { .. })
        ));
        assert!(matches!(
            mesh.add_triangle([a, VertexId::new(1), VertexId::new(9)]),
            Err(MeshError::InvalidVertexIndex { vertex: 9, .. })
        ));
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_delete_keeps_ids_stable() {
        let mut mesh = quad();
        assert_eq!(mesh.delete_triangles(&[FaceId::new(0)]).unwrap(), 1);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_face_slots(), 2);
        assert!(mesh.face(FaceId::new(0)).is_none());
        assert!(mesh.face(FaceId::new(1)).is_some());

        // Vertex 1 is now unreferenced.
        assert_eq!(mesh.remove_isolated_vertices(), 1);
        assert_eq!(mesh.num_vertices(), 3);
        assert!(!mesh.contains_vertex(VertexId::new(1)));
        assert!(mesh.contains_vertex(VertexId::new(3)));
        assert_eq!(mesh.num_vertex_slots(), 4);
    }

    #[test]
    fn test_delete_stale_face_is_atomic() {
        let mut mesh = quad();
        mesh.delete_triangles(&[FaceId::new(1)]).unwrap();
        let result = mesh.delete_triangles(&[FaceId::new(0), FaceId::new(1)]);
        assert!(matches!(result, Err(MeshError::StaleFace { face: 1 })));
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_normals_and_boundary() {
        let mut mesh = quad();
        mesh.update_normals();
        for v in mesh.vertex_ids() {
            assert!((mesh.normal(v) - Vector3::z()).norm() < 1e-12);
        }
        // Four outer edges, the diagonal is shared.
        assert_eq!(mesh.boundary_edges().len(), 4);
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_face_normal() {
        let mut mesh = TriMesh::<u32>::new();
        let a = mesh.add_vertex(Point3::origin());
        let b = mesh.add_vertex(Point3::origin());
        let c = mesh.add_vertex(Point3::origin());
        let f = mesh.add_triangle([a, b, c]).unwrap();
        assert!(mesh.face_normal(f).is_none());
        mesh.update_normals();
        assert_eq!(*mesh.normal(a), Vector3::zeros());
    }
}
