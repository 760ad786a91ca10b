//! Stitching the rebuilt strip into the mesh.

use std::collections::HashSet;

use crate::error::Result;
use crate::mesh::{MeshIndex, TriMesh, VertexId};

use super::curve::RibbonCurves;
use super::services::RibbonServices;
use super::strip::SubdivisionGrid;

/// Triangle order for the strip quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Quads `[a, b, c]`, `[a, c, d]`.
    Forward,
    /// Quads `[a, c, b]`, `[a, d, c]`.
    Reversed,
}

/// Pick the strip winding that runs against the surviving neighbour faces.
///
/// Each surviving face edge along the top or down curve votes. A face that
/// already uses top edge `top[i] -> top[i+1]` (or down edge
/// `down[i+1] -> down[i]`) would share that direction with a forward strip,
/// so it votes for [`Winding::Reversed`]. Ties keep [`Winding::Forward`].
pub fn strip_winding<I: MeshIndex>(mesh: &TriMesh<I>, curves: &RibbonCurves<I>) -> Winding {
    let directed: HashSet<(VertexId<I>, VertexId<I>)> = mesh.directed_edges().collect();
    let (mut keep, mut flip) = (0usize, 0usize);

    for (i, j) in curves.column_pairs() {
        let (t0, t1) = (curves.top[i], curves.top[j]);
        let (d0, d1) = (curves.down[i], curves.down[j]);
        flip += directed.contains(&(t0, t1)) as usize + directed.contains(&(d1, d0)) as usize;
        keep += directed.contains(&(t1, t0)) as usize + directed.contains(&(d0, d1)) as usize;
    }

    log::trace!("strip winding votes: keep {}, flip {}", keep, flip);
    if flip > keep {
        Winding::Reversed
    } else {
        Winding::Forward
    }
}

/// Add two triangles per grid cell. Returns the number of triangles added.
pub fn stitch_strip<I: MeshIndex>(
    mesh: &mut TriMesh<I>,
    grid: &SubdivisionGrid<I>,
    column_pairs: &[(usize, usize)],
    winding: Winding,
) -> Result<usize> {
    let mut added = 0;
    for r in 0..grid.num_rows().saturating_sub(1) {
        for &(i, j) in column_pairs {
            let a = grid.get(r, i);
            let b = grid.get(r, j);
            let c = grid.get(r + 1, j);
            let d = grid.get(r + 1, i);
            let quad = match winding {
                Winding::Forward => [[a, b, c], [a, c, d]],
                Winding::Reversed => [[a, c, b], [a, d, c]],
            };
            for tri in quad {
                mesh.add_triangle(tri)?;
                added += 1;
            }
        }
    }
    Ok(added)
}

/// Close the two end gaps left by an open strip.
///
/// Issues exactly one hole-fill request seeded with the first and last top
/// vertices. Returns the seeds and the number of triangles added.
pub fn close_open_ends<I, S>(
    mesh: &mut TriMesh<I>,
    services: &S,
    top: &[VertexId<I>],
) -> Result<(Vec<VertexId<I>>, usize)>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    let seeds: Vec<VertexId<I>> = match (top.first(), top.last()) {
        (Some(&first), Some(&last)) => vec![first, last],
        _ => Vec::new(),
    };
    let added = services.fill_holes(mesh, &seeds)?;
    Ok((seeds, added))
}

/// Drop vertices left without triangles and recompute normals.
///
/// Returns the number of pruned vertices.
pub fn finish_mesh<I: MeshIndex>(mesh: &mut TriMesh<I>) -> usize {
    let pruned = mesh.remove_isolated_vertices();
    mesh.update_normals();
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{grid_mesh, grid_vertex, ring, tube_mesh};
    use crate::mesh::{AdjacencyGraph, FaceId};
    use crate::ribbon::region::{flood_region, region_triangles};
    use nalgebra::Point3;

    #[test]
    fn test_winding_on_tube_is_forward() {
        let segments = 6;
        let mut mesh = tube_mesh(7, segments, 1.0);
        let curves = RibbonCurves::closed(ring(3, segments), ring(2, segments), ring(4, segments));
        let graph = AdjacencyGraph::build(&mesh);
        let marks = flood_region(&graph, &[&curves.top, &curves.down], &curves.center);
        mesh.delete_triangles(&region_triangles(&mesh, &marks)).unwrap();

        assert_eq!(strip_winding(&mesh, &curves), Winding::Forward);

        // Swapping top and down flips the vote.
        let swapped = RibbonCurves::closed(curves.center.clone(), curves.down.clone(), curves.top.clone());
        assert_eq!(strip_winding(&mesh, &swapped), Winding::Reversed);
    }

    #[test]
    fn test_stitch_matches_surface_orientation() {
        let n = 4;
        let mut mesh = grid_mesh(n);
        // Remove the cells between rows 1 and 2 and rebuild them as a one-row strip.
        let doomed: Vec<FaceId> = (0..n)
            .flat_map(|i| [FaceId::new(2 * (n + i)), FaceId::new(2 * (n + i) + 1)])
            .collect();
        mesh.delete_triangles(&doomed).unwrap();

        let top: Vec<_> = (0..=n).map(|i| grid_vertex(n, i, 1)).collect();
        let down: Vec<_> = (0..=n).map(|i| grid_vertex(n, i, 2)).collect();
        let curves = RibbonCurves::open(top.clone(), top.clone(), down.clone());
        let winding = strip_winding(&mesh, &curves);
        assert_eq!(winding, Winding::Forward);

        let first_new = mesh.num_face_slots();
        let grid = SubdivisionGrid::new(vec![top, down]);
        let added = stitch_strip(&mut mesh, &grid, &curves.column_pairs(), winding).unwrap();

        assert_eq!(added, 2 * n);
        assert_eq!(mesh.boundary_edges().len(), 4 * n);
        for f in (first_new..mesh.num_face_slots()).map(FaceId::new) {
            assert!(mesh.face_normal(f).unwrap().z > 0.99);
        }
    }

    #[test]
    fn test_finish_prunes_and_renormals() {
        let mut mesh = grid_mesh(1);
        let stray = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        assert_eq!(finish_mesh(&mut mesh), 1);
        assert!(!mesh.contains_vertex(stray));
        assert!(mesh.normal(VertexId::new(0)).z > 0.99);
    }
}
