//! The curve bundle a ribbon edit is driven by.

use std::collections::HashSet;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriMesh, VertexId};

/// Center curve plus the two offset curves straddling it.
///
/// `top[i]` and `down[i]` form cross-section `i`, so both offset curves must
/// have the same length. The center curve only seeds the region flood and may
/// have any non-zero length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RibbonCurves<I: MeshIndex = u32> {
    /// Curve the ribbon is centered on.
    pub center: Vec<VertexId<I>>,
    /// Offset curve on one side of the center.
    pub top: Vec<VertexId<I>>,
    /// Offset curve on the other side.
    pub down: Vec<VertexId<I>>,
    /// Whether all three curves wrap around.
    pub closed: bool,
}

impl<I: MeshIndex> RibbonCurves<I> {
    /// Bundle three curves.
    pub fn new(
        center: Vec<VertexId<I>>,
        top: Vec<VertexId<I>>,
        down: Vec<VertexId<I>>,
        closed: bool,
    ) -> Self {
        Self {
            center,
            top,
            down,
            closed,
        }
    }

    /// Bundle three closed curves.
    pub fn closed(center: Vec<VertexId<I>>, top: Vec<VertexId<I>>, down: Vec<VertexId<I>>) -> Self {
        Self::new(center, top, down, true)
    }

    /// Bundle three open curves.
    pub fn open(center: Vec<VertexId<I>>, top: Vec<VertexId<I>>, down: Vec<VertexId<I>>) -> Self {
        Self::new(center, top, down, false)
    }

    /// Number of cross-sections.
    #[inline]
    pub fn string_size(&self) -> usize {
        self.top.len()
    }

    /// Pairs `(i, j)` of neighbouring cross-sections the strip spans.
    pub fn column_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.string_size();
        if self.closed {
            (0..n).map(|i| (i, (i + 1) % n)).collect()
        } else {
            (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect()
        }
    }

    /// Check the curves against `mesh` before anything is modified.
    ///
    /// # Errors
    ///
    /// - [`MeshError::EmptyMesh`] if the mesh has no faces
    /// - [`MeshError::CurveLengthMismatch`] if top and down differ in length
    /// - [`MeshError::CurveTooShort`] for fewer than two cross-sections (three
    ///   when closed) or an empty center curve
    /// - [`MeshError::UnknownVertex`] for ids that are not live
    /// - [`MeshError::DuplicateCurveVertex`] if a curve repeats a vertex
    pub fn validate(&self, mesh: &TriMesh<I>) -> Result<()> {
        if mesh.num_faces() == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if self.top.len() != self.down.len() {
            return Err(MeshError::CurveLengthMismatch {
                top: self.top.len(),
                down: self.down.len(),
            });
        }
        let (min, reason) = if self.closed {
            (3, "two closed cross-sections would stitch the same column pair twice")
        } else {
            (2, "a strip needs a first and a last cross-section")
        };
        if self.top.len() < min {
            return Err(MeshError::CurveTooShort {
                curve: "top",
                len: self.top.len(),
                min,
                reason,
            });
        }
        if self.center.is_empty() {
            return Err(MeshError::CurveTooShort {
                curve: "center",
                len: 0,
                min: 1,
                reason: "the region flood is seeded from the center curve",
            });
        }

        for (name, curve) in [("center", &self.center), ("top", &self.top), ("down", &self.down)] {
            check_curve(mesh, name, curve)?;
        }
        Ok(())
    }
}

fn check_curve<I: MeshIndex>(
    mesh: &TriMesh<I>,
    name: &'static str,
    curve: &[VertexId<I>],
) -> Result<()> {
    let mut seen = HashSet::with_capacity(curve.len());
    for &v in curve {
        if !mesh.contains_vertex(v) {
            return Err(MeshError::UnknownVertex {
                curve: name,
                vertex: v.index(),
            });
        }
        if !seen.insert(v) {
            return Err(MeshError::DuplicateCurveVertex {
                curve: name,
                vertex: v.index(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{ring, tube_mesh};

    #[test]
    fn test_valid_closed_curves() {
        let mesh = tube_mesh(5, 6, 1.0);
        let curves = RibbonCurves::closed(ring(2, 6), ring(1, 6), ring(3, 6));
        assert!(curves.validate(&mesh).is_ok());
        assert_eq!(curves.string_size(), 6);
        assert_eq!(curves.column_pairs().len(), 6);
        assert_eq!(curves.column_pairs()[5], (5, 0));
    }

    #[test]
    fn test_open_column_pairs() {
        let curves: RibbonCurves = RibbonCurves::open(ring(2, 4), ring(1, 4), ring(3, 4));
        assert_eq!(curves.column_pairs(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_rejects_malformed_curves() {
        let mesh = tube_mesh(5, 6, 1.0);

        let mut short = ring(3, 6);
        short.pop();
        let curves = RibbonCurves::closed(ring(2, 6), ring(1, 6), short);
        assert!(matches!(
            curves.validate(&mesh),
            Err(MeshError::CurveLengthMismatch { top: 6, down: 5 })
        ));

        let curves = RibbonCurves::closed(ring(2, 6), vec![VertexId::new(0); 2], vec![VertexId::new(1); 2]);
        let err = curves.validate(&mesh).unwrap_err();
        assert!(matches!(err, MeshError::CurveTooShort { curve: "top", len: 2, min: 3, .. }));
        assert!(err.to_string().contains("same column pair twice"), "{}", err);

        let curves = RibbonCurves::closed(Vec::new(), ring(1, 6), ring(3, 6));
        assert!(matches!(
            curves.validate(&mesh),
            Err(MeshError::CurveTooShort { curve: "center", .. })
        ));

        let mut top = ring(1, 6);
        top[4] = VertexId::new(500);
        let curves = RibbonCurves::closed(ring(2, 6), top, ring(3, 6));
        assert!(matches!(
            curves.validate(&mesh),
            Err(MeshError::UnknownVertex { curve: "top", vertex: 500 })
        ));

        let mut down = ring(3, 6);
        down[5] = down[0];
        let curves = RibbonCurves::closed(ring(2, 6), ring(1, 6), down);
        assert!(matches!(
            curves.validate(&mesh),
            Err(MeshError::DuplicateCurveVertex { curve: "down", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let mesh = TriMesh::<u32>::new();
        let curves = RibbonCurves::open(ring(0, 2), ring(0, 2), ring(0, 2));
        assert!(matches!(curves.validate(&mesh), Err(MeshError::EmptyMesh)));
    }
}
