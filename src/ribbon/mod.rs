//! Curve-ribbon mesh surgery.
//!
//! A ribbon edit takes three vertex curves on a triangle mesh: a center curve
//! and two offset curves (`top` and `down`) straddling it. It cuts out the
//! triangles between the offset curves and rebuilds the gap as a subdivided
//! strip whose cross-section follows one of three profiles:
//!
//! - [`Profile::Chamfer`]: a flat bevel between handle points
//! - [`Profile::Blend`]: the same bevel after smoothing the offset curves
//! - [`Profile::Sharp`]: a single ridge through an apex point
//!
//! Open curve bundles get their two end gaps closed by hole filling.
//!
//! # Example
//!
//! ```no_run
//! use meshrib::prelude::*;
//!
//! let mut mesh: TriMesh = meshrib::io::load("part.ply").unwrap();
//! let curves: RibbonCurves = meshrib::io::load_curves("part.curves").unwrap();
//!
//! let report = apply_ribbon(
//!     &mut mesh,
//!     &curves,
//!     Profile::Blend,
//!     &RibbonOptions::default().with_subdivisions(4),
//!     &MeshServices::new(),
//! )
//! .unwrap();
//! println!("added {} vertices", report.inserted_vertices);
//! ```
//!
//! # Collaborators
//!
//! Geodesic paths, curve smoothing, polyline subdivision and hole filling are
//! reached through the [`RibbonServices`] trait. [`MeshServices`] wires them to
//! the algorithms in [`crate::algo`].

mod control;
mod curve;
mod filter;
mod frame;
mod patch;
mod pipeline;
mod region;
mod services;
mod strip;
mod task;

pub use control::{build_control_polylines, smooth_interior_points, ControlLayout};
pub use curve::RibbonCurves;
pub use filter::{smooth_directions, smooth_magnitudes, smooth_sequence, FilterPass};
pub use frame::{build_frames, cross_sections, estimate_directions, CrossSection, ExtrusionFrame};
pub use patch::Winding;
pub use pipeline::{
    apply_ribbon, apply_ribbon_with_progress, Profile, ProfileConfig, RibbonOptions, RibbonReport,
    Stage,
};
pub use region::{flood_region, RegionMarks};
pub use services::{MeshServices, RibbonServices};
pub use strip::SubdivisionGrid;
pub use task::RibbonTask;
