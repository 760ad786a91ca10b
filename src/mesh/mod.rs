//! Core mesh data structures.
//!
//! This module provides the editable triangle mesh and related types used by
//! the ribbon engine.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`], an indexed triangle mesh whose vertex and
//! triangle ids stay stable while triangles are deleted and inserted. Vertex
//! neighborhoods are derived on demand through [`AdjacencyGraph`].
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use meshrib::mesh::{TriMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod adjacency;
mod builder;
mod index;
mod trimesh;

#[cfg(test)]
pub(crate) mod fixtures;

pub use adjacency::AdjacencyGraph;
pub use builder::{build_from_triangles, to_face_vertex};
pub use index::{FaceId, MeshIndex, VertexId};
pub use trimesh::{TriMesh, Vertex};

pub(crate) use trimesh::DEGENERATE_EPS;
