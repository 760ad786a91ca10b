//! Vertex adjacency graph.
//!
//! [`AdjacencyGraph`] is an arena of neighbor sets indexed by vertex slot. It is
//! derived from the triangle list once per operation and treated as read-only
//! afterwards, so it reflects the mesh as it was when it was built.

use super::index::{MeshIndex, VertexId};
use super::trimesh::TriMesh;

/// Undirected vertex-neighbor graph built from a triangle list.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<I: MeshIndex = u32> {
    neighbors: Vec<Vec<VertexId<I>>>,
}

impl<I: MeshIndex> AdjacencyGraph<I> {
    /// Build the graph from every live triangle of `mesh`.
    ///
    /// Each triangle `(a, b, c)` contributes the edges `ab`, `bc` and `ca` to
    /// both endpoints. Neighbor sets are sorted and free of duplicates.
    pub fn build(mesh: &TriMesh<I>) -> Self {
        let mut neighbors: Vec<Vec<VertexId<I>>> = vec![Vec::new(); mesh.num_vertex_slots()];
        for (_, tri) in mesh.faces() {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                neighbors[a.index()].push(b);
                neighbors[b.index()].push(a);
            }
        }
        for set in &mut neighbors {
            set.sort_unstable();
            set.dedup();
        }
        Self { neighbors }
    }

    /// Number of vertex slots covered by the graph.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph covers no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of `v`; empty for isolated or unknown vertices.
    #[inline]
    pub fn neighbors(&self, v: VertexId<I>) -> &[VertexId<I>] {
        self.neighbors.get(v.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of neighbors of `v`.
    #[inline]
    pub fn degree(&self, v: VertexId<I>) -> usize {
        self.neighbors(v).len()
    }

    /// Whether `a` and `b` share an edge.
    pub fn are_adjacent(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::grid_mesh;

    #[test]
    fn test_grid_degrees() {
        // 3x3 vertices, diagonals from (i, j) to (i + 1, j + 1).
        let mesh = grid_mesh(2);
        let graph = AdjacencyGraph::build(&mesh);

        assert_eq!(graph.len(), 9);
        assert_eq!(graph.degree(VertexId::new(4)), 6);
        assert_eq!(graph.degree(VertexId::new(0)), 3);
        assert_eq!(graph.degree(VertexId::new(2)), 2);
        assert!(graph.are_adjacent(VertexId::new(0), VertexId::new(4)));
        assert!(!graph.are_adjacent(VertexId::new(2), VertexId::new(4)));
    }

    #[test]
    fn test_symmetry() {
        let mesh = grid_mesh(3);
        let graph = AdjacencyGraph::build(&mesh);
        for v in mesh.vertex_ids() {
            for &n in graph.neighbors(v) {
                assert!(graph.neighbors(n).contains(&v));
                assert_ne!(n, v);
            }
        }
    }

    #[test]
    fn test_unknown_vertex_has_no_neighbors() {
        let mesh = grid_mesh(1);
        let graph = AdjacencyGraph::build(&mesh);
        assert!(graph.neighbors(VertexId::new(100)).is_empty());
    }
}
