//! Subdividing control polylines into the rows of the new strip.
//!
//! Every control polyline is subdivided into the same number of points. Point
//! `r` of polyline `i` becomes grid entry `rows[r][i]`: row 0 reuses the top
//! curve, the last row reuses the down curve, and each interior row gets one
//! new vertex per cross-section.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriMesh, VertexId};

use super::services::RibbonServices;

/// Vertex ids of the strip, `rows[row][cross_section]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivisionGrid<I: MeshIndex = u32> {
    rows: Vec<Vec<VertexId<I>>>,
}

impl<I: MeshIndex> SubdivisionGrid<I> {
    /// Wrap rows of vertex ids.
    pub fn new(rows: Vec<Vec<VertexId<I>>>) -> Self {
        Self { rows }
    }

    /// Number of rows, including the top and down rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of cross-sections.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// All rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<VertexId<I>>] {
        &self.rows
    }

    /// Vertex at `(row, column)`.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> VertexId<I> {
        self.rows[row][column]
    }

    /// Vertices created for interior rows.
    pub fn interior_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        let end = self.rows.len().saturating_sub(1);
        self.rows
            .get(1..end)
            .unwrap_or(&[])
            .iter()
            .flat_map(|row| row.iter().copied())
    }
}

/// Number of points a polyline of `points` control points subdivides into.
#[inline]
pub fn subdivided_len(points: usize, count: usize) -> usize {
    points.saturating_sub(1) * count + 1
}

/// Subdivide every control polyline through `services`.
///
/// # Errors
///
/// Returns [`MeshError::Service`] if the service returns the wrong number of
/// points or moves an endpoint.
pub fn subdivide_polylines<I, S>(
    services: &S,
    polylines: &[Vec<Point3<f64>>],
    count: usize,
) -> Result<Vec<Vec<Point3<f64>>>>
where
    I: MeshIndex,
    S: RibbonServices<I> + ?Sized,
{
    polylines
        .iter()
        .enumerate()
        .map(|(i, polyline)| {
            let points = services.subdivide_polyline(polyline, count)?;
            let expected = subdivided_len(polyline.len(), count);
            if points.len() != expected {
                return Err(MeshError::service(
                    "polyline subdivision",
                    format!(
                        "cross-section {i}: expected {expected} points, got {}",
                        points.len()
                    ),
                ));
            }
            if points.first() != polyline.first() || points.last() != polyline.last() {
                return Err(MeshError::service(
                    "polyline subdivision",
                    format!("cross-section {i}: endpoints moved"),
                ));
            }
            Ok(points)
        })
        .collect()
}

/// Add the interior rows to `mesh` and return the full grid.
///
/// New vertices copy the attributes of the nearer endpoint of their
/// cross-section. Interior rows are inserted row by row, so new ids increase
/// along each row.
///
/// # Errors
///
/// Returns [`MeshError::Service`] if the subdivided polylines differ in
/// length.
pub fn insert_rows<I: MeshIndex>(
    mesh: &mut TriMesh<I>,
    top: &[VertexId<I>],
    down: &[VertexId<I>],
    subdivided: &[Vec<Point3<f64>>],
) -> Result<SubdivisionGrid<I>> {
    let rows = subdivided.first().map_or(0, Vec::len);
    if rows < 2 || subdivided.iter().any(|points| points.len() != rows) {
        return Err(MeshError::service(
            "polyline subdivision",
            "cross-sections subdivided into different row counts",
        ));
    }

    let mut grid = Vec::with_capacity(rows);
    grid.push(top.to_vec());
    for r in 1..rows - 1 {
        let source = if r < rows / 2 { top } else { down };
        let row = source
            .iter()
            .zip(subdivided)
            .map(|(&v, points)| {
                let record = mesh.vertex(v).with_position(points[r]);
                mesh.add_vertex_record(record)
            })
            .collect();
        grid.push(row);
    }
    grid.push(down.to_vec());

    Ok(SubdivisionGrid::new(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::services::MeshServices;
    use nalgebra::Vector3;

    #[test]
    fn test_subdivided_len() {
        assert_eq!(subdivided_len(4, 3), 10);
        assert_eq!(subdivided_len(3, 3), 7);
        assert_eq!(subdivided_len(2, 3), 4);
    }

    #[test]
    fn test_insert_rows_copies_nearer_attributes() {
        let mut mesh = TriMesh::<u32>::new();
        let mut top = Vec::new();
        let mut down = Vec::new();
        for i in 0..3 {
            top.push(mesh.add_vertex(Point3::new(i as f64, 0.0, 0.0)));
            down.push(mesh.add_vertex(Point3::new(i as f64, 3.0, 0.0)));
        }
        for &v in &top {
            mesh.vertex_mut(v).color = Some(Vector3::new(1.0, 0.0, 0.0));
        }
        for &v in &down {
            mesh.vertex_mut(v).color = Some(Vector3::new(0.0, 0.0, 1.0));
        }

        let polylines: Vec<_> = top
            .iter()
            .zip(&down)
            .map(|(&t, &d)| vec![*mesh.position(t), *mesh.position(d)])
            .collect();
        let subdivided = subdivide_polylines::<u32, _>(&MeshServices::new(), &polylines, 3).unwrap();
        let grid = insert_rows(&mut mesh, &top, &down, &subdivided).unwrap();

        assert_eq!(grid.num_rows(), 4);
        assert_eq!(grid.num_columns(), 3);
        assert_eq!(grid.interior_vertices().count(), 6);
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(grid.rows()[0], top);
        assert_eq!(grid.rows()[3], down);

        let near_top = grid.get(1, 2);
        assert_eq!(*mesh.position(near_top), Point3::new(2.0, 1.0, 0.0));
        assert_eq!(mesh.vertex(near_top).color, Some(Vector3::new(1.0, 0.0, 0.0)));
        let near_down = grid.get(2, 0);
        assert_eq!(mesh.vertex(near_down).color, Some(Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_inconsistent_rows_rejected() {
        let mut mesh = TriMesh::<u32>::new();
        let a = mesh.add_vertex(Point3::origin());
        let b = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let subdivided = vec![vec![Point3::origin(); 4], vec![Point3::origin(); 3]];
        let result = insert_rows(&mut mesh, &[a, a], &[b, b], &subdivided);
        assert!(matches!(result, Err(MeshError::Service { .. })));
        assert_eq!(mesh.num_vertices(), 2);
    }
}
