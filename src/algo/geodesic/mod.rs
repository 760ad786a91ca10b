//! Approximate geodesic distances and paths on meshes.
//!
//! Distances are measured along mesh edges with Dijkstra's algorithm. This is
//! exact on the edge graph and approximates true surface geodesics, which is
//! all the ribbon engine needs to bridge the ends of open curves.
//!
//! # Example
//!
//! ```
//! use meshrib::prelude::*;
//! use meshrib::algo::geodesic::shortest_path;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: TriMesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let graph = AdjacencyGraph::build(&mesh);
//!
//! let path = shortest_path(&mesh, &graph, VertexId::new(1), VertexId::new(3)).unwrap();
//! assert_eq!(path.len(), 3);
//! ```

mod dijkstra;

use std::marker::PhantomData;

pub use dijkstra::{dijkstra, shortest_path, DijkstraOptions};

use crate::mesh::{MeshIndex, VertexId};

/// Result of geodesic distance computation.
///
/// Contains distances from the source vertex to all vertex slots, and
/// optionally predecessor information for path reconstruction.
#[derive(Debug, Clone)]
pub struct GeodesicResult<I: MeshIndex = u32> {
    /// `f64::INFINITY` for unreachable vertices.
    distances: Vec<f64>,

    /// `None` entries mark the source and unreachable vertices.
    predecessors: Option<Vec<Option<usize>>>,

    _marker: PhantomData<I>,
}

impl<I: MeshIndex> GeodesicResult<I> {
    pub(crate) fn new(distances: Vec<f64>, predecessors: Option<Vec<Option<usize>>>) -> Self {
        Self {
            distances,
            predecessors,
            _marker: PhantomData,
        }
    }

    /// Get the distance to a vertex.
    ///
    /// Returns `f64::INFINITY` if the vertex is unreachable from the source.
    #[inline]
    pub fn distance(&self, v: VertexId<I>) -> f64 {
        self.distances
            .get(v.index())
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Check if a vertex is reachable from the source.
    #[inline]
    pub fn is_reachable(&self, v: VertexId<I>) -> bool {
        self.distance(v).is_finite()
    }

    /// Reconstruct the shortest path from a source to the given vertex.
    ///
    /// Returns `None` if predecessors weren't stored or the vertex is
    /// unreachable. The returned path includes both the source and target.
    pub fn path_to(&self, target: VertexId<I>) -> Option<Vec<VertexId<I>>> {
        let predecessors = self.predecessors.as_ref()?;
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = target.index();
        loop {
            path.push(VertexId::new(current));
            match predecessors[current] {
                Some(pred) => current = pred,
                None => break,
            }
            if path.len() > self.distances.len() {
                return None;
            }
        }

        path.reverse();
        Some(path)
    }
}
