//! Smoothing of vertex curves embedded in a mesh.
//!
//! A curve is an ordered list of vertex ids. Smoothing relaxes each curve
//! vertex towards the midpoint of its curve neighbors, the one-dimensional
//! analogue of Laplacian surface smoothing. Displacements are projected onto
//! the vertex tangent plane so the curve slides along the surface instead of
//! cutting into it.
//!
//! # Example
//!
//! ```
//! use meshrib::prelude::*;
//! use meshrib::algo::smooth::{smooth_curve, CurveSmoothOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.3, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//! ];
//! let faces = vec![[0, 3, 1], [1, 3, 2]];
//! let mut mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let curve = [VertexId::new(0), VertexId::new(1), VertexId::new(2)];
//! smooth_curve(&mut mesh, &curve, false, &CurveSmoothOptions::default()).unwrap();
//! assert!(mesh.position(VertexId::new(1)).y < 0.3);
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriMesh, VertexId, DEGENERATE_EPS};

/// Options for curve smoothing.
#[derive(Debug, Clone)]
pub struct CurveSmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Smoothing factor (0.0 to 1.0).
    pub lambda: f64,

    /// Turning angle in radians below which a vertex is left in place.
    ///
    /// Nearly straight stretches of the curve are not touched, so smoothing
    /// only removes kinks.
    pub angle_tolerance: f64,

    /// Whether to use parallel execution (default: false, curves are short).
    pub parallel: bool,
}

impl Default for CurveSmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 3,
            lambda: 0.5,
            angle_tolerance: 5f64.to_radians(),
            parallel: false,
        }
    }
}

impl CurveSmoothOptions {
    /// Create options with the specified number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create options with the specified lambda value.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Set the turning angle (radians) below which vertices stay put.
    pub fn with_angle_tolerance(mut self, radians: f64) -> Self {
        self.angle_tolerance = radians.max(0.0);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Smooth a vertex curve in place.
///
/// Endpoints of an open curve are fixed. Returns the number of vertex moves
/// performed over all iterations.
///
/// # Errors
///
/// Returns [`MeshError::UnknownVertex`] if the curve names a vertex that is not
/// live. The mesh is not modified in that case.
pub fn smooth_curve<I: MeshIndex + Sync>(
    mesh: &mut TriMesh<I>,
    curve: &[VertexId<I>],
    closed: bool,
    options: &CurveSmoothOptions,
) -> Result<usize> {
    if let Some(&bad) = curve.iter().find(|&&v| !mesh.contains_vertex(v)) {
        return Err(MeshError::UnknownVertex {
            curve: "smoothed",
            vertex: bad.index(),
        });
    }

    let n = curve.len();
    if n < 3 || options.iterations == 0 || options.lambda == 0.0 {
        return Ok(0);
    }

    let active: Vec<usize> = if closed { (0..n).collect() } else { (1..n - 1).collect() };
    let mut moves = 0;

    for _ in 0..options.iterations {
        let mesh_ref = &*mesh;
        let step = |&i: &usize| curve_step(mesh_ref, curve, i, closed, options);
        let updates: Vec<Option<Point3<f64>>> = if options.parallel {
            active.par_iter().map(step).collect()
        } else {
            active.iter().map(step).collect()
        };

        let mut moved_this_pass = 0;
        for (&i, update) in active.iter().zip(updates) {
            if let Some(pos) = update {
                mesh.set_position(curve[i], pos);
                moved_this_pass += 1;
            }
        }

        log::trace!("curve smoothing pass moved {} of {} vertices", moved_this_pass, n);
        if moved_this_pass == 0 {
            break;
        }
        moves += moved_this_pass;
    }

    Ok(moves)
}

/// New position for curve vertex `i`, or `None` if it stays in place.
fn curve_step<I: MeshIndex>(
    mesh: &TriMesh<I>,
    curve: &[VertexId<I>],
    i: usize,
    closed: bool,
    options: &CurveSmoothOptions,
) -> Option<Point3<f64>> {
    let n = curve.len();
    let (prev, next) = if closed {
        ((i + n - 1) % n, (i + 1) % n)
    } else {
        (i - 1, i + 1)
    };

    let p = *mesh.position(curve[i]);
    let p_prev = *mesh.position(curve[prev]);
    let p_next = *mesh.position(curve[next]);

    let incoming = (p - p_prev).try_normalize(DEGENERATE_EPS)?;
    let outgoing = (p_next - p).try_normalize(DEGENERATE_EPS)?;
    let turning = incoming.dot(&outgoing).clamp(-1.0, 1.0).acos();
    if turning <= options.angle_tolerance {
        return None;
    }

    let midpoint = Point3::from((p_prev.coords + p_next.coords) * 0.5);
    let delta = tangent_component((midpoint - p) * options.lambda, mesh.normal(curve[i]));
    if delta.norm() < DEGENERATE_EPS {
        return None;
    }
    Some(p + delta)
}

/// Remove the component of `v` along `normal`. Zero normals leave `v` unchanged.
fn tangent_component(v: Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    match normal.try_normalize(DEGENERATE_EPS) {
        Some(n) => v - n * n.dot(&v),
        None => v,
    }
}
