//! Dijkstra's algorithm for geodesic distances.
//!
//! Computes shortest path distances along mesh edges. Edge weights are the
//! Euclidean lengths of the edges in the adjacency graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyGraph, MeshIndex, TriMesh, VertexId};

use super::GeodesicResult;

/// Options for Dijkstra's algorithm.
#[derive(Debug, Clone, Default)]
pub struct DijkstraOptions {
    /// Whether to store predecessor information for path reconstruction.
    pub store_predecessors: bool,

    /// Stop once this vertex is settled.
    pub target: Option<usize>,
}

impl DijkstraOptions {
    /// Enable predecessor storage for path reconstruction.
    pub fn with_predecessors(mut self, store: bool) -> Self {
        self.store_predecessors = store;
        self
    }

    /// Set target vertex for early termination.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone)]
struct DijkstraEntry {
    vertex: usize,
    distance: f64,
}

impl PartialEq for DijkstraEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for DijkstraEntry {}

impl PartialOrd for DijkstraEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Compute geodesic distances from a single source vertex.
pub fn dijkstra<I: MeshIndex>(
    mesh: &TriMesh<I>,
    graph: &AdjacencyGraph<I>,
    source: VertexId<I>,
    options: &DijkstraOptions,
) -> GeodesicResult<I> {
    let n = graph.len();

    if source.index() >= n {
        return GeodesicResult::new(vec![f64::INFINITY; n], None);
    }

    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors: Option<Vec<Option<usize>>> = if options.store_predecessors {
        Some(vec![None; n])
    } else {
        None
    };
    let mut heap = BinaryHeap::new();
    distances[source.index()] = 0.0;
    heap.push(DijkstraEntry {
        vertex: source.index(),
        distance: 0.0,
    });

    while let Some(DijkstraEntry { vertex: u, distance: dist_u }) = heap.pop() {
        if dist_u > distances[u] {
            continue;
        }
        if options.target == Some(u) {
            break;
        }

        let u_vertex = VertexId::<I>::new(u);
        let p_u = mesh.position(u_vertex);
        for &v_vertex in graph.neighbors(u_vertex) {
            let v = v_vertex.index();
            let new_dist = dist_u + (mesh.position(v_vertex) - p_u).norm();

            if new_dist < distances[v] {
                distances[v] = new_dist;
                if let Some(ref mut preds) = predecessors {
                    preds[v] = Some(u);
                }
                heap.push(DijkstraEntry {
                    vertex: v,
                    distance: new_dist,
                });
            }
        }
    }

    GeodesicResult::new(distances, predecessors)
}

/// Shortest edge path between two vertices, both endpoints included.
///
/// Returns [`MeshError::NoPath`] if `to` cannot be reached from `from`.
pub fn shortest_path<I: MeshIndex>(
    mesh: &TriMesh<I>,
    graph: &AdjacencyGraph<I>,
    from: VertexId<I>,
    to: VertexId<I>,
) -> Result<Vec<VertexId<I>>> {
    let options = DijkstraOptions::default()
        .with_predecessors(true)
        .with_target(to.index());
    dijkstra(mesh, graph, from, &options)
        .path_to(to)
        .ok_or(MeshError::NoPath {
            from: from.index(),
            to: to.index(),
        })
}
