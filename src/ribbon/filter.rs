//! Low-pass filtering of per-cross-section sequences.
//!
//! Values indexed by cross-section (directions, handle lengths, control
//! points) are smoothed along the curve with a two-neighbour average. Closed
//! sequences wrap around; open sequences keep their first and last values.

use std::ops::{Add, Mul};

use nalgebra::Vector3;

use crate::mesh::DEGENERATE_EPS;

/// One filter configuration: `iterations` passes with blend `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPass {
    /// Number of passes.
    pub iterations: usize,
    /// How far each value moves towards its neighbour average (0.0 to 1.0).
    pub weight: f64,
}

impl FilterPass {
    /// Create a filter configuration.
    pub const fn new(iterations: usize, weight: f64) -> Self {
        Self { iterations, weight }
    }

    /// A pass that leaves values unchanged.
    pub const fn disabled() -> Self {
        Self::new(0, 0.0)
    }

    /// Whether this pass changes nothing.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.iterations == 0 || self.weight == 0.0
    }
}

impl Default for FilterPass {
    fn default() -> Self {
        Self::new(5, 0.5)
    }
}

/// Smooth `values` in place.
///
/// Each pass computes `new[i] = old[i] * (1 - w) + (old[i-1] + old[i+1]) / 2 * w`.
/// Closed sequences wrap modulo their length; open sequences keep index `0`
/// and `len - 1` fixed. Open sequences shorter than 3 and closed sequences
/// shorter than 2 are left unchanged.
pub fn smooth_sequence<T>(values: &mut [T], closed: bool, pass: FilterPass)
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
{
    smooth_with(values, closed, pass, |_| {});
}

/// Smooth unit vectors, renormalizing after every pass.
///
/// Averages that cancel out become zero vectors.
pub fn smooth_directions(values: &mut [Vector3<f64>], closed: bool, pass: FilterPass) {
    smooth_with(values, closed, pass, |vs| {
        for v in vs.iter_mut() {
            *v = v.try_normalize(DEGENERATE_EPS).unwrap_or_else(Vector3::zeros);
        }
    });
}

/// Smooth the lengths of `values` while keeping each vector's direction.
pub fn smooth_magnitudes(values: &mut [Vector3<f64>], closed: bool, pass: FilterPass) {
    if pass.is_noop() {
        return;
    }
    let mut lengths: Vec<f64> = values.iter().map(|v| v.norm()).collect();
    smooth_sequence(&mut lengths, closed, pass);
    for (v, len) in values.iter_mut().zip(lengths) {
        *v = match v.try_normalize(DEGENERATE_EPS) {
            Some(dir) => dir * len,
            None => Vector3::zeros(),
        };
    }
}

fn smooth_with<T, F>(values: &mut [T], closed: bool, pass: FilterPass, after_pass: F)
where
    T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    F: Fn(&mut [T]),
{
    let n = values.len();
    let too_short = if closed { n < 2 } else { n < 3 };
    if too_short || pass.is_noop() {
        return;
    }

    let w = pass.weight;
    let range = if closed { 0..n } else { 1..n - 1 };
    let mut old = values.to_vec();

    for _ in 0..pass.iterations {
        for i in range.clone() {
            let prev = old[(i + n - 1) % n];
            let next = old[(i + 1) % n];
            values[i] = old[i] * (1.0 - w) + (prev + next) * (0.5 * w);
        }
        after_pass(values);
        old.copy_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_endpoints_fixed() {
        let mut values = vec![0.0, 10.0, 0.0, 10.0, 0.0];
        smooth_sequence(&mut values, false, FilterPass::new(3, 0.5));
        assert_eq!(values[0], 0.0);
        assert_eq!(values[4], 0.0);
        assert!(values[1] < 10.0);
        assert!(values[2] > 0.0);
    }

    #[test]
    fn test_closed_preserves_sum() {
        let mut values = vec![0.0, 0.0, 8.0, 0.0, 0.0, 0.0];
        smooth_sequence(&mut values, true, FilterPass::new(4, 0.5));
        assert_relative_eq!(values.iter().sum::<f64>(), 8.0, epsilon = 1e-12);
        // Symmetric spread around the spike.
        assert_relative_eq!(values[1], values[3], epsilon = 1e-12);
        assert_relative_eq!(values[0], values[4], epsilon = 1e-12);
    }

    #[test]
    fn test_constant_sequence_unchanged() {
        let mut values = vec![Vector3::new(1.0, 2.0, 3.0); 4];
        smooth_sequence(&mut values, true, FilterPass::default());
        assert!(values.iter().all(|v| (v - Vector3::new(1.0, 2.0, 3.0)).norm() < 1e-12));
    }

    #[test]
    fn test_short_and_noop_sequences() {
        let mut values = vec![1.0, 5.0];
        smooth_sequence(&mut values, false, FilterPass::default());
        assert_eq!(values, vec![1.0, 5.0]);

        let mut values = vec![1.0, 5.0, 1.0];
        smooth_sequence(&mut values, false, FilterPass::disabled());
        assert_eq!(values, vec![1.0, 5.0, 1.0]);
    }

    #[test]
    fn test_directions_stay_unit() {
        let mut dirs = vec![Vector3::x(), Vector3::y(), Vector3::x(), Vector3::y()];
        smooth_directions(&mut dirs, true, FilterPass::new(2, 0.5));
        for d in &dirs {
            assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_opposite_directions_cancel_to_zero() {
        let mut dirs = vec![Vector3::x(), Vector3::y(), -Vector3::x(), -Vector3::y()];
        smooth_directions(&mut dirs, true, FilterPass::new(1, 1.0));
        assert_eq!(dirs, vec![Vector3::zeros(); 4]);
    }

    #[test]
    fn test_magnitudes_keep_direction() {
        let mut extends = vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        smooth_magnitudes(&mut extends, false, FilterPass::new(1, 0.5));
        assert_eq!(extends[0], Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(extends[1], Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
