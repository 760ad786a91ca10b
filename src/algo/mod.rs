//! Mesh algorithms used by the ribbon engine.
//!
//! - **Geodesics**: Dijkstra shortest paths over mesh edges
//! - **Smoothing**: tangent-plane smoothing of vertex curves
//! - **Subdivision**: arc-length resampling of polylines
//! - **Holes**: boundary loop tracing and fan filling
//!
//! Together these form the default collaborators behind
//! [`MeshServices`](crate::ribbon::MeshServices).

pub mod geodesic;
pub mod holes;
pub mod smooth;
pub mod subdivide;

mod progress;

pub use progress::{CancelToken, Progress};
