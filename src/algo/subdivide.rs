//! Uniform subdivision of polylines.
//!
//! [`subdivide_polyline`] resamples a polyline at equal arc-length steps. A
//! polyline of `n` points subdivided with `count` yields `(n - 1) * count + 1`
//! points, the same count as splitting every segment into `count` pieces, but
//! spaced evenly along the whole curve so short and long segments get the same
//! density.

use nalgebra::Point3;

use crate::error::{MeshError, Result};

/// Resample `points` to `(points.len() - 1) * count + 1` points evenly spaced
/// by arc length.
///
/// The first and last output points are exactly the first and last input
/// points. A polyline of zero length yields repeated copies of its start.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if `count` is zero or fewer than
/// two points are given.
///
/// # Example
///
/// ```
/// use meshrib::algo::subdivide::subdivide_polyline;
/// use nalgebra::Point3;
///
/// let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)];
/// let out = subdivide_polyline(&points, 3).unwrap();
/// assert_eq!(out.len(), 4);
/// assert!((out[1].x - 1.0).abs() < 1e-12);
/// ```
pub fn subdivide_polyline(points: &[Point3<f64>], count: usize) -> Result<Vec<Point3<f64>>> {
    if count == 0 {
        return Err(MeshError::invalid_param("count", count, "must be at least 1"));
    }
    if points.len() < 2 {
        return Err(MeshError::invalid_param(
            "points",
            points.len(),
            "polyline needs at least two points",
        ));
    }

    let target = (points.len() - 1) * count + 1;
    let first = points[0];
    let last = points[points.len() - 1];

    let mut lengths = Vec::with_capacity(points.len());
    lengths.push(0.0);
    for pair in points.windows(2) {
        let total = lengths[lengths.len() - 1];
        lengths.push(total + (pair[1] - pair[0]).norm());
    }
    let total_len = lengths[lengths.len() - 1];

    if !(total_len > 0.0 && total_len.is_finite()) {
        return Ok(vec![first; target]);
    }

    let mut result = Vec::with_capacity(target);
    result.push(first);
    let mut seg = 0;
    for k in 1..target - 1 {
        let s = total_len * k as f64 / (target - 1) as f64;
        while seg + 1 < lengths.len() - 1 && lengths[seg + 1] < s {
            seg += 1;
        }
        let span = lengths[seg + 1] - lengths[seg];
        let t = if span > 0.0 {
            ((s - lengths[seg]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        result.push(points[seg] + (points[seg + 1] - points[seg]) * t);
    }
    result.push(last);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_output_count_and_endpoints() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 1.0),
        ];
        for count in 1..5 {
            let out = subdivide_polyline(&points, count).unwrap();
            assert_eq!(out.len(), 3 * count + 1);
            assert_eq!(out[0], points[0]);
            assert_eq!(out[out.len() - 1], points[3]);
        }
    }

    #[test]
    fn test_even_arc_length_spacing() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ];
        let out = subdivide_polyline(&points, 2).unwrap();
        assert_eq!(out.len(), 5);
        for pair in out.windows(2) {
            assert_relative_eq!((pair[1] - pair[0]).norm(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(out[1], Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_count_one_keeps_point_count() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 5.0)];
        let out = subdivide_polyline(&points, 1).unwrap();
        assert_eq!(out, points.to_vec());
    }

    #[test]
    fn test_zero_length_polyline() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let out = subdivide_polyline(&[p, p, p], 3).unwrap();
        assert_eq!(out, vec![p; 7]);
    }

    #[test]
    fn test_invalid_input() {
        let p = Point3::origin();
        assert!(matches!(
            subdivide_polyline(&[p, p], 0),
            Err(MeshError::InvalidParameter { name: "count", .. })
        ));
        assert!(subdivide_polyline(&[p], 3).is_err());
    }
}
