//! Extrusion frames for cross-sections.
//!
//! Each cross-section `(top[i], down[i])` gets an outward extrusion direction
//! and two *extend* vectors: handles at the top and down vertices that reach
//! across the section and lift it along the surface normals, so the new strip
//! bulges out the way the surface it replaces curved. Control polylines are
//! built from these handles.
//!
//! Degenerate input (zero normals, zero span, coincident neighbours) never
//! fails. It produces zero vectors, which collapse the affected control
//! polylines onto a straight segment.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{MeshIndex, TriMesh, VertexId, DEGENERATE_EPS};

use super::filter::{smooth_magnitudes, FilterPass};

/// Positions and normals of one cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    /// Top vertex position.
    pub top: Point3<f64>,
    /// Down vertex position.
    pub down: Point3<f64>,
    /// Top vertex normal (unit or zero).
    pub top_normal: Vector3<f64>,
    /// Down vertex normal (unit or zero).
    pub down_normal: Vector3<f64>,
}

impl CrossSection {
    /// Midpoint between the top and down vertices.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.top.coords + self.down.coords) * 0.5)
    }

    /// Distance between the top and down vertices.
    #[inline]
    pub fn span(&self) -> f64 {
        (self.down - self.top).norm()
    }
}

/// Extrusion direction and handles of one cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionFrame {
    /// Unit extrusion direction, or zero.
    pub direction: Vector3<f64>,
    /// Handle at the top vertex: the span to the down vertex plus the
    /// in-plane top normal.
    pub top_extend: Vector3<f64>,
    /// Handle at the down vertex, mirroring the top handle.
    pub down_extend: Vector3<f64>,
}

impl ExtrusionFrame {
    /// A frame with all vectors zero.
    pub fn zero() -> Self {
        Self {
            direction: Vector3::zeros(),
            top_extend: Vector3::zeros(),
            down_extend: Vector3::zeros(),
        }
    }
}

/// Read the cross-sections of paired curves from the mesh.
pub fn cross_sections<I: MeshIndex>(
    mesh: &TriMesh<I>,
    top: &[VertexId<I>],
    down: &[VertexId<I>],
) -> Vec<CrossSection> {
    top.iter()
        .zip(down)
        .map(|(&t, &d)| CrossSection {
            top: *mesh.position(t),
            down: *mesh.position(d),
            top_normal: *mesh.normal(t),
            down_normal: *mesh.normal(d),
        })
        .collect()
}

/// Estimate an extrusion direction per cross-section.
///
/// The direction is the Newell normal of the quad
/// `top[i-1], top[i+1], down[i+1], down[i-1]` taken around the section
/// center, oriented to agree with the averaged vertex normals of the
/// section. Open curves reuse the end section as its own missing neighbour.
pub fn estimate_directions(sections: &[CrossSection], closed: bool, parallel: bool) -> Vec<Vector3<f64>> {
    let n = sections.len();
    let direction = |i: usize| {
        let (prev, next) = neighbor_sections(i, n, closed);
        section_direction(&sections[prev], &sections[i], &sections[next])
    };
    if parallel {
        (0..n).into_par_iter().map(direction).collect()
    } else {
        (0..n).map(direction).collect()
    }
}

/// Build frames from (possibly smoothed) directions.
pub fn build_frames(sections: &[CrossSection], directions: &[Vector3<f64>], parallel: bool) -> Vec<ExtrusionFrame> {
    let frame = |(section, direction): (&CrossSection, &Vector3<f64>)| extend_frame(section, direction);
    if parallel {
        sections.par_iter().zip(directions.par_iter()).map(frame).collect()
    } else {
        sections.iter().zip(directions.iter()).map(frame).collect()
    }
}

/// Smooth handle lengths along the curve while keeping their directions.
pub fn smooth_extends(frames: &mut [ExtrusionFrame], closed: bool, pass: FilterPass) {
    let mut tops: Vec<Vector3<f64>> = frames.iter().map(|f| f.top_extend).collect();
    let mut downs: Vec<Vector3<f64>> = frames.iter().map(|f| f.down_extend).collect();
    smooth_magnitudes(&mut tops, closed, pass);
    smooth_magnitudes(&mut downs, closed, pass);
    for ((frame, top), down) in frames.iter_mut().zip(tops).zip(downs) {
        frame.top_extend = top;
        frame.down_extend = down;
    }
}

fn neighbor_sections(i: usize, n: usize, closed: bool) -> (usize, usize) {
    if closed {
        ((i + n - 1) % n, (i + 1) % n)
    } else {
        (i.saturating_sub(1), (i + 1).min(n - 1))
    }
}

fn section_direction(prev: &CrossSection, current: &CrossSection, next: &CrossSection) -> Vector3<f64> {
    let c = current.center();
    let ring = [prev.top, next.top, next.down, prev.down];

    let mut sum = Vector3::zeros();
    for k in 0..4 {
        let a = ring[k] - c;
        let b = ring[(k + 1) % 4] - c;
        sum += a.cross(&b);
    }

    let Some(dir) = sum.try_normalize(DEGENERATE_EPS) else {
        return Vector3::zeros();
    };
    let reference = current.top_normal + current.down_normal;
    if dir.dot(&reference) < 0.0 {
        -dir
    } else {
        dir
    }
}

fn extend_frame(section: &CrossSection, direction: &Vector3<f64>) -> ExtrusionFrame {
    let span_vec = section.down - section.top;
    let span = span_vec.norm();
    if span < DEGENERATE_EPS || direction.norm() < DEGENERATE_EPS {
        return ExtrusionFrame {
            direction: *direction,
            ..ExtrusionFrame::zero()
        };
    }

    // Cutting plane through top, down and the center pushed out along the direction.
    let apex = section.center() + direction * (0.5 * span);
    let Some(plane_normal) = span_vec.cross(&(apex - section.top)).try_normalize(DEGENERATE_EPS) else {
        return ExtrusionFrame {
            direction: *direction,
            ..ExtrusionFrame::zero()
        };
    };

    ExtrusionFrame {
        direction: *direction,
        top_extend: surface_handle(&section.top_normal, &plane_normal, &span_vec),
        down_extend: surface_handle(&section.down_normal, &plane_normal, &-span_vec),
    }
}

/// Handle at one end of a cross-section, `toward` being the vector to the
/// other end.
///
/// The in-plane part of the normal, mirrored across the plane orthogonal to
/// `toward` when it leans towards the other end, plus `toward` itself.
fn surface_handle(normal: &Vector3<f64>, plane_normal: &Vector3<f64>, toward: &Vector3<f64>) -> Vector3<f64> {
    if normal.norm() < DEGENERATE_EPS {
        return Vector3::zeros();
    }
    let mut in_plane = normal - plane_normal * plane_normal.dot(normal);
    if in_plane.norm() < DEGENERATE_EPS {
        return Vector3::zeros();
    }
    let Some(axis) = toward.try_normalize(DEGENERATE_EPS) else {
        return Vector3::zeros();
    };

    let along = in_plane.dot(&axis);
    if along > 0.0 {
        in_plane -= axis * (2.0 * along);
    }
    in_plane + toward
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::fixtures::{grid_mesh, grid_vertex, ring, tube_mesh};
    use approx::assert_relative_eq;

    #[test]
    fn test_tube_frames_point_outward_and_bulge() {
        let segments = 8;
        let mesh = tube_mesh(7, segments, 1.0);
        let sections = cross_sections(&mesh, &ring(2, segments), &ring(4, segments));
        let directions = estimate_directions(&sections, true, false);
        let frames = build_frames(&sections, &directions, false);

        for (section, frame) in sections.iter().zip(&frames) {
            let radial = Vector3::new(section.top.x, section.top.y, 0.0).normalize();
            assert_relative_eq!(frame.direction, radial, epsilon = 1e-9);
            // Span along the axis, lifted outward by the radial normal.
            assert_relative_eq!(frame.top_extend, radial + Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-9);
            assert_relative_eq!(frame.down_extend, radial + Vector3::new(0.0, 0.0, -2.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_open_grid_handles_lean_along_normal() {
        let n = 8;
        let mesh = grid_mesh(n);
        let top: Vec<_> = (2..=6).map(|i| grid_vertex(n, i, 2)).collect();
        let down: Vec<_> = (2..=6).map(|i| grid_vertex(n, i, 4)).collect();
        let sections = cross_sections(&mesh, &top, &down);
        let directions = estimate_directions(&sections, false, true);
        let frames = build_frames(&sections, &directions, true);

        assert_eq!(frames.len(), 5);
        for (section, frame) in sections.iter().zip(&frames) {
            assert_relative_eq!(frame.direction, Vector3::z(), epsilon = 1e-12);
            assert_relative_eq!(frame.top_extend, Vector3::new(0.0, 2.0, 1.0), epsilon = 1e-12);
            assert_relative_eq!(frame.down_extend, Vector3::new(0.0, -2.0, 1.0), epsilon = 1e-12);
            assert_relative_eq!(frame.top_extend - (section.down - section.top), section.top_normal, epsilon = 1e-12);
        }

        // The two handle tips meet one unit above the section center.
        let s = &sections[2];
        let f = &frames[2];
        let apex = Point3::from(((s.top + f.top_extend).coords + (s.down + f.down_extend).coords) * 0.5);
        assert_relative_eq!(apex, s.center() + Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_roof_handles_follow_normals() {
        // A single section folded like a roof: normals tilt away from the ridge.
        let top_normal = Vector3::new(0.0, -1.0, 1.0).normalize();
        let section = CrossSection {
            top: Point3::new(0.0, 0.0, 0.0),
            down: Point3::new(0.0, 2.0, 0.0),
            top_normal,
            down_normal: Vector3::new(0.0, 1.0, 1.0).normalize(),
        };
        let frame = extend_frame(&section, &Vector3::z());

        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(frame.top_extend, Vector3::new(0.0, 2.0 - h, h), epsilon = 1e-12);
        assert_relative_eq!(frame.down_extend, Vector3::new(0.0, h - 2.0, h), epsilon = 1e-12);
    }

    #[test]
    fn test_normal_leaning_across_is_mirrored() {
        // Valley normals lean towards the other end and are mirrored back.
        let roof = CrossSection {
            top: Point3::new(0.0, 0.0, 0.0),
            down: Point3::new(0.0, 2.0, 0.0),
            top_normal: Vector3::new(0.0, -1.0, 1.0).normalize(),
            down_normal: Vector3::new(0.0, 1.0, 1.0).normalize(),
        };
        let valley = CrossSection {
            top_normal: roof.down_normal,
            down_normal: roof.top_normal,
            ..roof
        };

        let expected = extend_frame(&roof, &Vector3::z());
        let frame = extend_frame(&valley, &Vector3::z());
        assert_relative_eq!(frame.top_extend, expected.top_extend, epsilon = 1e-12);
        assert_relative_eq!(frame.down_extend, expected.down_extend, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_plane_normal_component_is_dropped() {
        let section = CrossSection {
            top: Point3::new(0.0, 0.0, 0.0),
            down: Point3::new(0.0, 2.0, 0.0),
            top_normal: Vector3::new(1.0, 0.0, 1.0).normalize(),
            down_normal: Vector3::x(),
        };
        let frame = extend_frame(&section, &Vector3::z());

        // The cutting plane is x = 0.
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(frame.top_extend, Vector3::new(0.0, 2.0, h), epsilon = 1e-12);
        // A normal orthogonal to the plane has nothing left to lift with.
        assert_eq!(frame.down_extend, Vector3::zeros());
    }

    #[test]
    fn test_smooth_extends_evens_out_lengths() {
        let mut frames = vec![
            ExtrusionFrame {
                direction: Vector3::z(),
                top_extend: Vector3::new(0.0, 1.0, 0.0),
                down_extend: Vector3::new(0.0, -1.0, 0.0),
            };
            3
        ];
        frames[1].top_extend = Vector3::new(0.0, 3.0, 0.0);
        smooth_extends(&mut frames, true, FilterPass::new(20, 0.5));

        for frame in &frames {
            assert_relative_eq!(frame.top_extend.norm(), 5.0 / 3.0, epsilon = 1e-6);
            assert_relative_eq!(frame.top_extend.normalize(), Vector3::y(), epsilon = 1e-12);
            assert_relative_eq!(frame.down_extend, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_sections_give_zero_vectors() {
        let p = Point3::new(1.0, 0.0, 0.0);
        let section = CrossSection {
            top: p,
            down: p,
            top_normal: Vector3::x(),
            down_normal: Vector3::x(),
        };
        let sections = vec![section; 4];
        let directions = estimate_directions(&sections, true, false);
        assert!(directions.iter().all(|d| *d == Vector3::zeros()));

        let frames = build_frames(&sections, &directions, false);
        assert!(frames.iter().all(|f| *f == ExtrusionFrame::zero()));

        // Zero normals with a real span still give zero handles.
        let section = CrossSection {
            top: Point3::origin(),
            down: Point3::new(0.0, 1.0, 0.0),
            top_normal: Vector3::zeros(),
            down_normal: Vector3::zeros(),
        };
        let frame = extend_frame(&section, &Vector3::z());
        assert_eq!(frame.top_extend, Vector3::zeros());
        assert_eq!(frame.down_extend, Vector3::zeros());
    }
}
