//! # Meshrib
//!
//! Curve-ribbon surgery on triangle meshes.
//!
//! Given a center curve and two offset curves drawn on a mesh, meshrib cuts
//! out the triangles between the offset curves and stitches in a new,
//! subdivided strip shaped as a chamfer, a blend or a sharp ridge.
//!
//! ## Features
//!
//! - **Stable-id triangle mesh**: [`mesh::TriMesh`] keeps vertex ids valid
//!   while triangles are deleted and inserted
//! - **Flexible indexing**: 16-bit, 32-bit and 64-bit indices
//! - **Transactional edits**: a failed ribbon edit leaves the input mesh untouched
//! - **Pluggable collaborators**: geodesics, curve smoothing, subdivision and
//!   hole filling behind [`ribbon::RibbonServices`]
//! - **File formats**: STL, PLY and a plain-text curve-set format
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshrib::prelude::*;
//!
//! let mut mesh: TriMesh = meshrib::io::load("model.ply").unwrap();
//! let curves: RibbonCurves = meshrib::io::load_curves("model.curves").unwrap();
//!
//! let report = apply_ribbon(
//!     &mut mesh,
//!     &curves,
//!     Profile::Sharp,
//!     &RibbonOptions::default(),
//!     &MeshServices::new(),
//! )
//! .unwrap();
//! println!("strip has {} rows", report.rows);
//!
//! meshrib::io::save(&mesh, "output.ply").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use meshrib::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//!
//! let graph = AdjacencyGraph::build(&mesh);
//! assert_eq!(graph.neighbors(VertexId::new(0)).len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod ribbon;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshrib::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{CancelToken, Progress};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, AdjacencyGraph, FaceId, MeshIndex, TriMesh, Vertex,
        VertexId,
    };
    pub use crate::ribbon::{
        apply_ribbon, apply_ribbon_with_progress, MeshServices, Profile, ProfileConfig,
        RibbonCurves, RibbonOptions, RibbonReport, RibbonServices, RibbonTask,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
