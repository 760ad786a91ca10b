//! Collaborators the ribbon engine delegates to.
//!
//! The engine never hard-wires geodesics, curve smoothing, polyline
//! subdivision or hole filling. It calls them through [`RibbonServices`] so a
//! host application can plug in its own implementations. [`MeshServices`]
//! provides the defaults from [`crate::algo`].

use nalgebra::Point3;

use crate::algo::geodesic::shortest_path;
use crate::algo::holes;
use crate::algo::smooth::{smooth_curve, CurveSmoothOptions};
use crate::algo::subdivide::subdivide_polyline;
use crate::error::Result;
use crate::mesh::{AdjacencyGraph, MeshIndex, TriMesh, VertexId};

/// External operations used by the ribbon pipeline.
pub trait RibbonServices<I: MeshIndex = u32> {
    /// Vertex path from `from` to `to`, both included.
    fn geodesic_path(
        &self,
        mesh: &TriMesh<I>,
        adjacency: &AdjacencyGraph<I>,
        from: VertexId<I>,
        to: VertexId<I>,
    ) -> Result<Vec<VertexId<I>>>;

    /// Smooth a vertex curve in place.
    fn smooth_curve(&self, mesh: &mut TriMesh<I>, curve: &[VertexId<I>], closed: bool) -> Result<()>;

    /// Subdivide a polyline into `(points.len() - 1) * count + 1` points with
    /// the input endpoints kept exactly.
    fn subdivide_polyline(&self, points: &[Point3<f64>], count: usize) -> Result<Vec<Point3<f64>>>;

    /// Fill the holes whose boundary passes through `seeds`. Returns the
    /// number of triangles added.
    fn fill_holes(&self, mesh: &mut TriMesh<I>, seeds: &[VertexId<I>]) -> Result<usize>;
}

/// Default services backed by the algorithms in [`crate::algo`].
#[derive(Debug, Clone, Default)]
pub struct MeshServices {
    /// Options for boundary curve smoothing.
    pub curve_smoothing: CurveSmoothOptions,
}

impl MeshServices {
    /// Create the default services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom curve smoothing options.
    pub fn with_curve_smoothing(mut self, options: CurveSmoothOptions) -> Self {
        self.curve_smoothing = options;
        self
    }
}

impl<I: MeshIndex> RibbonServices<I> for MeshServices {
    fn geodesic_path(
        &self,
        mesh: &TriMesh<I>,
        adjacency: &AdjacencyGraph<I>,
        from: VertexId<I>,
        to: VertexId<I>,
    ) -> Result<Vec<VertexId<I>>> {
        shortest_path(mesh, adjacency, from, to)
    }

    fn smooth_curve(&self, mesh: &mut TriMesh<I>, curve: &[VertexId<I>], closed: bool) -> Result<()> {
        let moved = smooth_curve(mesh, curve, closed, &self.curve_smoothing)?;
        log::trace!("boundary curve smoothing made {} vertex moves", moved);
        Ok(())
    }

    fn subdivide_polyline(&self, points: &[Point3<f64>], count: usize) -> Result<Vec<Point3<f64>>> {
        subdivide_polyline(points, count)
    }

    fn fill_holes(&self, mesh: &mut TriMesh<I>, seeds: &[VertexId<I>]) -> Result<usize> {
        holes::fill_holes(mesh, seeds)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Services that record calls and can be told to fail.

    use std::sync::Mutex;

    use super::*;
    use crate::error::MeshError;

    /// Which service should fail.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailAt {
        Nothing,
        Geodesic,
        Subdivide,
        FillHoles,
    }

    /// Wraps [`MeshServices`], recording calls.
    #[derive(Debug)]
    pub struct RecordingServices {
        inner: MeshServices,
        fail_at: FailAt,
        pub geodesic_calls: Mutex<Vec<(usize, usize)>>,
        pub smooth_calls: Mutex<Vec<usize>>,
        pub fill_calls: Mutex<Vec<Vec<usize>>>,
    }

    impl RecordingServices {
        pub fn new() -> Self {
            Self::failing(FailAt::Nothing)
        }

        pub fn failing(fail_at: FailAt) -> Self {
            Self {
                inner: MeshServices::new(),
                fail_at,
                geodesic_calls: Mutex::new(Vec::new()),
                smooth_calls: Mutex::new(Vec::new()),
                fill_calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl RibbonServices for RecordingServices {
        fn geodesic_path(
            &self,
            mesh: &TriMesh,
            adjacency: &AdjacencyGraph,
            from: VertexId,
            to: VertexId,
        ) -> Result<Vec<VertexId>> {
            self.geodesic_calls.lock().unwrap().push((from.index(), to.index()));
            if self.fail_at == FailAt::Geodesic {
                return Err(MeshError::service("geodesic", "injected failure"));
            }
            self.inner.geodesic_path(mesh, adjacency, from, to)
        }

        fn smooth_curve(&self, mesh: &mut TriMesh, curve: &[VertexId], closed: bool) -> Result<()> {
            self.smooth_calls.lock().unwrap().push(curve.len());
            self.inner.smooth_curve(mesh, curve, closed)
        }

        fn subdivide_polyline(&self, points: &[Point3<f64>], count: usize) -> Result<Vec<Point3<f64>>> {
            if self.fail_at == FailAt::Subdivide {
                return Err(MeshError::service("polyline subdivision", "injected failure"));
            }
            RibbonServices::<u32>::subdivide_polyline(&self.inner, points, count)
        }

        fn fill_holes(&self, mesh: &mut TriMesh, seeds: &[VertexId]) -> Result<usize> {
            self.fill_calls
                .lock()
                .unwrap()
                .push(seeds.iter().map(|v| v.index()).collect());
            if self.fail_at == FailAt::FillHoles {
                return Err(MeshError::service("hole filling", "injected failure"));
            }
            self.inner.fill_holes(mesh, seeds)
        }
    }
}
