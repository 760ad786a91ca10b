//! Boundary loops and hole filling.
//!
//! A *hole half-edge* is the reverse of a triangle edge that has no opposite
//! edge in another triangle. Hole half-edges chain head to tail into boundary
//! loops that run against the winding of the faces around them, so a fan
//! triangulated along a loop continues the surrounding orientation.

use std::collections::{HashMap, HashSet};

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriMesh, VertexId};

/// Outgoing hole half-edges per start vertex.
type HoleEdges = HashMap<usize, Vec<usize>>;

fn collect_hole_edges<I: MeshIndex>(mesh: &TriMesh<I>) -> HoleEdges {
    let directed: HashSet<(usize, usize)> = mesh
        .directed_edges()
        .map(|(a, b)| (a.index(), b.index()))
        .collect();

    let mut outgoing: HoleEdges = HashMap::new();
    for &(a, b) in &directed {
        if !directed.contains(&(b, a)) {
            outgoing.entry(b).or_default().push(a);
        }
    }
    // Traced with pop(), so the smallest target is taken first.
    for targets in outgoing.values_mut() {
        targets.sort_unstable_by(|x, y| y.cmp(x));
    }
    outgoing
}

/// Follow hole half-edges from `start` until the loop closes.
///
/// Consumes the edges it walks. Returns `None` if `start` has no unused
/// outgoing hole half-edge.
fn trace_loop(edges: &mut HoleEdges, start: usize, limit: usize) -> Result<Option<Vec<usize>>> {
    let mut vertices = vec![start];
    let mut current = start;
    loop {
        let next = match edges.get_mut(&current).and_then(Vec::pop) {
            Some(next) => next,
            None if vertices.len() == 1 => return Ok(None),
            None => {
                return Err(MeshError::service(
                    "hole filling",
                    format!("boundary through vertex {start} does not close"),
                ))
            }
        };
        if next == start {
            return Ok(Some(vertices));
        }
        if vertices.len() > limit {
            return Err(MeshError::service(
                "hole filling",
                format!("boundary through vertex {start} does not close"),
            ));
        }
        vertices.push(next);
        current = next;
    }
}

/// All boundary loops of the mesh, each in hole half-edge order.
///
/// # Errors
///
/// Returns [`MeshError::Service`] if the boundary edges do not chain into
/// closed loops.
pub fn boundary_loops<I: MeshIndex>(mesh: &TriMesh<I>) -> Result<Vec<Vec<VertexId<I>>>> {
    let mut edges = collect_hole_edges(mesh);
    let limit: usize = edges.values().map(Vec::len).sum();

    let mut starts: Vec<usize> = edges.keys().copied().collect();
    starts.sort_unstable();

    let mut loops = Vec::new();
    for start in starts {
        while let Some(found) = trace_loop(&mut edges, start, limit)? {
            loops.push(found.into_iter().map(VertexId::new).collect());
        }
    }
    Ok(loops)
}

/// Fill every hole whose boundary passes through one of `seeds`.
///
/// Each loop is triangulated with a fan from its first vertex and filled at
/// most once, even if several seeds lie on it. Seeds that are not on a
/// boundary are ignored. Returns the number of triangles added.
///
/// # Errors
///
/// Returns [`MeshError::UnknownVertex`] for a seed that is not live, and
/// [`MeshError::Service`] if a loop does not close or passes through the same
/// vertex twice. Loops are traced before any triangle is added, so the mesh is
/// unchanged on error.
pub fn fill_holes<I: MeshIndex>(mesh: &mut TriMesh<I>, seeds: &[VertexId<I>]) -> Result<usize> {
    if let Some(&bad) = seeds.iter().find(|&&v| !mesh.contains_vertex(v)) {
        return Err(MeshError::UnknownVertex {
            curve: "hole seed",
            vertex: bad.index(),
        });
    }

    let mut edges = collect_hole_edges(mesh);
    let limit: usize = edges.values().map(Vec::len).sum();

    let mut loops = Vec::new();
    for &seed in seeds {
        if let Some(found) = trace_loop(&mut edges, seed.index(), limit)? {
            let distinct: HashSet<usize> = found.iter().copied().collect();
            if distinct.len() != found.len() {
                return Err(MeshError::service(
                    "hole filling",
                    format!("boundary through vertex {} is pinched", seed.index()),
                ));
            }
            loops.push(found);
        } else {
            log::debug!("hole seed {:?} is not on a boundary", seed);
        }
    }

    let mut added = 0;
    for boundary in &loops {
        let apex = VertexId::new(boundary[0]);
        for pair in boundary[1..].windows(2) {
            mesh.add_triangle([apex, VertexId::new(pair[0]), VertexId::new(pair[1])])?;
            added += 1;
        }
        log::trace!("filled hole of {} vertices", boundary.len());
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{grid_mesh, grid_vertex, tube_mesh};
    use crate::mesh::FaceId;
    use nalgebra::Vector3;

    /// 4x4 grid with cell (1, 1) removed.
    fn holed_grid() -> TriMesh {
        let mut mesh = grid_mesh(4);
        mesh.delete_triangles(&[FaceId::new(10), FaceId::new(11)]).unwrap();
        mesh
    }

    #[test]
    fn test_boundary_loops() {
        assert_eq!(boundary_loops(&grid_mesh(4)).unwrap().len(), 1);

        let loops = boundary_loops(&holed_grid()).unwrap();
        let mut sizes: Vec<usize> = loops.iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![4, 16]);

        assert_eq!(boundary_loops(&tube_mesh(3, 6, 1.0)).unwrap().len(), 2);
    }

    #[test]
    fn test_fill_hole_matches_orientation() {
        let mut mesh = holed_grid();
        let before = mesh.num_faces();
        let added = fill_holes(&mut mesh, &[grid_vertex(4, 1, 1)]).unwrap();

        assert_eq!(added, 2);
        assert_eq!(mesh.num_faces(), before + 2);
        assert_eq!(mesh.boundary_edges().len(), 16);
        for f in (before..mesh.num_face_slots()).map(FaceId::new) {
            let n = mesh.face_normal(f).unwrap();
            assert!(n.dot(&Vector3::z()) > 0.99);
        }
    }

    #[test]
    fn test_two_seeds_on_one_loop_fill_once() {
        let mut mesh = holed_grid();
        let seeds = [grid_vertex(4, 1, 1), grid_vertex(4, 2, 2)];
        assert_eq!(fill_holes(&mut mesh, &seeds).unwrap(), 2);
    }

    #[test]
    fn test_interior_seed_is_ignored() {
        let mut mesh = grid_mesh(4);
        assert_eq!(fill_holes(&mut mesh, &[grid_vertex(4, 2, 2)]).unwrap(), 0);
        assert_eq!(mesh.num_faces(), 32);
    }

    #[test]
    fn test_unknown_seed() {
        let mut mesh = grid_mesh(2);
        let result = fill_holes(&mut mesh, &[VertexId::new(42)]);
        assert!(matches!(result, Err(MeshError::UnknownVertex { vertex: 42, .. })));
    }
}
