//! Marking the strip of surface a ribbon replaces.
//!
//! The region is grown breadth-first from seed vertices over the adjacency
//! graph and stopped by *fence* vertices that are never crossed. For closed
//! curves the top and down curves form the fence and the center curve seeds
//! the flood. Open curves leave the strip open at both ends, so two bridge
//! paths connecting the curve ends are added to the fence first.

use std::collections::VecDeque;

use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyGraph, FaceId, MeshIndex, TriMesh, VertexId};

use super::curve::RibbonCurves;
use super::services::RibbonServices;

/// Vertex marks produced by a region flood.
///
/// Both arrays are indexed by vertex slot. The interior never contains a
/// fence vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMarks {
    fence: Vec<bool>,
    interior: Vec<bool>,
}

impl RegionMarks {
    /// Whether vertex slot `v` is part of the fence.
    #[inline]
    pub fn is_fence(&self, v: usize) -> bool {
        self.fence.get(v).copied().unwrap_or(false)
    }

    /// Whether vertex slot `v` was reached by the flood.
    #[inline]
    pub fn is_interior(&self, v: usize) -> bool {
        self.interior.get(v).copied().unwrap_or(false)
    }

    /// Whether vertex slot `v` belongs to the region at all.
    #[inline]
    pub fn is_marked(&self, v: usize) -> bool {
        self.is_fence(v) || self.is_interior(v)
    }

    /// Number of fence vertices.
    pub fn fence_count(&self) -> usize {
        self.fence.iter().filter(|&&f| f).count()
    }

    /// Number of interior vertices.
    pub fn interior_count(&self) -> usize {
        self.interior.iter().filter(|&&i| i).count()
    }

    /// Number of marked vertices.
    pub fn marked_count(&self) -> usize {
        self.fence_count() + self.interior_count()
    }

    /// Interior vertex slots in increasing order.
    pub fn interior_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.interior
            .iter()
            .enumerate()
            .filter(|(_, inside)| **inside)
            .map(|(v, _)| v)
    }
}

/// Flood from `seeds` without ever entering a fence vertex.
///
/// Seeds that lie on the fence are ignored.
pub fn flood_region<I: MeshIndex>(
    graph: &AdjacencyGraph<I>,
    fences: &[&[VertexId<I>]],
    seeds: &[VertexId<I>],
) -> RegionMarks {
    let n = graph.len();
    let mut fence = vec![false; n];
    let mut interior = vec![false; n];

    for v in fences.iter().flat_map(|curve| curve.iter()) {
        if let Some(slot) = fence.get_mut(v.index()) {
            *slot = true;
        }
    }

    let mut queue = VecDeque::new();
    for &seed in seeds {
        let s = seed.index();
        if s < n && !fence[s] && !interior[s] {
            interior[s] = true;
            queue.push_back(seed);
        }
    }

    while let Some(u) = queue.pop_front() {
        for &v in graph.neighbors(u) {
            let i = v.index();
            if !fence[i] && !interior[i] {
                interior[i] = true;
                queue.push_back(v);
            }
        }
    }

    RegionMarks { fence, interior }
}

/// Live triangles whose three vertices are all marked.
pub fn region_triangles<I: MeshIndex>(mesh: &TriMesh<I>, marks: &RegionMarks) -> Vec<FaceId<I>> {
    mesh.faces()
        .filter(|(_, tri)| tri.iter().all(|v| marks.is_marked(v.index())))
        .map(|(f, _)| f)
        .collect()
}

/// Mark the region between the top and down curves.
///
/// Open curves query `services` for the two bridge paths joining
/// `top[0]`/`down[0]` and `top[last]`/`down[last]`.
pub fn mark_ribbon_region<I, S>(
    mesh: &TriMesh<I>,
    graph: &AdjacencyGraph<I>,
    curves: &RibbonCurves<I>,
    services: &S,
) -> Result<RegionMarks>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    if curves.closed {
        let marks = flood_region(graph, &[&curves.top, &curves.down], &curves.center);
        return Ok(marks);
    }

    let last = curves.string_size() - 1;
    let start = bridge(mesh, graph, services, curves.top[0], curves.down[0])?;
    let end = bridge(mesh, graph, services, curves.top[last], curves.down[last])?;
    let seed = curves.center[curves.center.len() / 2];

    Ok(flood_region(
        graph,
        &[&curves.top, &curves.down, &start, &end],
        &[seed],
    ))
}

fn bridge<I, S>(
    mesh: &TriMesh<I>,
    graph: &AdjacencyGraph<I>,
    services: &S,
    from: VertexId<I>,
    to: VertexId<I>,
) -> Result<Vec<VertexId<I>>>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    let path = services.geodesic_path(mesh, graph, from, to)?;
    if path.first() != Some(&from) || path.last() != Some(&to) {
        return Err(MeshError::service(
            "geodesic",
            format!("path does not join {:?} to {:?}", from, to),
        ));
    }
    if let Some(bad) = path.iter().find(|&&v| !mesh.contains_vertex(v)) {
        return Err(MeshError::service(
            "geodesic",
            format!("path visits unknown vertex {:?}", bad),
        ));
    }
    log::trace!("bridge {:?} -> {:?} has {} vertices", from, to, path.len());
    Ok(path)
}
