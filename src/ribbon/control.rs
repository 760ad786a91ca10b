//! Control polylines spanning each cross-section.
//!
//! A control polyline starts at the top vertex and ends at the down vertex.
//! Its interior points shape the profile of the rebuilt ribbon: none for a
//! ruled strip, two handle points for a bevel, one apex for a ridge.

use nalgebra::{Point3, Vector3};

use crate::mesh::{MeshIndex, TriMesh, VertexId};

use super::filter::{smooth_sequence, FilterPass};
use super::frame::{CrossSection, ExtrusionFrame};

/// Interior point layout of a control polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLayout {
    /// `[top, down]`: a plain ruled strip.
    Straight,
    /// `[top, top + handle, down + handle, down]`: a bevel.
    Handles,
    /// `[top, apex, down]`: a single ridge.
    Apex,
}

impl ControlLayout {
    /// Number of control points per cross-section.
    pub fn point_count(self) -> usize {
        match self {
            ControlLayout::Straight => 2,
            ControlLayout::Apex => 3,
            ControlLayout::Handles => 4,
        }
    }
}

/// Build one control polyline per cross-section.
///
/// `handle_scale` scales the extend vectors for [`ControlLayout::Handles`].
/// The apex of [`ControlLayout::Apex`] is the midpoint of the two fully
/// extended handle tips.
pub fn build_control_polylines(
    sections: &[CrossSection],
    frames: &[ExtrusionFrame],
    layout: ControlLayout,
    handle_scale: f64,
) -> Vec<Vec<Point3<f64>>> {
    sections
        .iter()
        .zip(frames)
        .map(|(s, f)| match layout {
            ControlLayout::Straight => vec![s.top, s.down],
            ControlLayout::Handles => vec![
                s.top,
                s.top + f.top_extend * handle_scale,
                s.down + f.down_extend * handle_scale,
                s.down,
            ],
            ControlLayout::Apex => {
                let top_tip = s.top + f.top_extend;
                let down_tip = s.down + f.down_extend;
                vec![s.top, Point3::from((top_tip.coords + down_tip.coords) * 0.5), s.down]
            }
        })
        .collect()
}

/// Smooth interior control points along the curve direction.
///
/// Point `k` of every polyline forms one sequence over the cross-sections,
/// filtered with [`smooth_sequence`]. Endpoints are never touched.
pub fn smooth_interior_points(polylines: &mut [Vec<Point3<f64>>], closed: bool, pass: FilterPass) {
    let Some(len) = polylines.first().map(Vec::len) else {
        return;
    };
    if pass.is_noop() || polylines.iter().any(|p| p.len() != len) {
        return;
    }

    for k in 1..len.saturating_sub(1) {
        let mut column: Vec<Vector3<f64>> = polylines.iter().map(|p| p[k].coords).collect();
        smooth_sequence(&mut column, closed, pass);
        for (polyline, smoothed) in polylines.iter_mut().zip(column) {
            polyline[k] = Point3::from(smoothed);
        }
    }
}

/// Reset polyline endpoints to the current top and down vertex positions.
pub fn refresh_endpoints<I: MeshIndex>(
    polylines: &mut [Vec<Point3<f64>>],
    mesh: &TriMesh<I>,
    top: &[VertexId<I>],
    down: &[VertexId<I>],
) {
    for ((polyline, &t), &d) in polylines.iter_mut().zip(top).zip(down) {
        if let Some(first) = polyline.first_mut() {
            *first = *mesh.position(t);
        }
        if let Some(last) = polyline.last_mut() {
            *last = *mesh.position(d);
        }
    }
}
