//! Hermite cubic segment math.
//!
//! A segment interpolates between two endpoint (value, derivative) pairs over
//! a width measured from 0. The fitter uses segments to generate candidate
//! curves; the pruner and reducer use them to test whether an existing curve
//! already reproduces a point.

use crate::data::{SplineNode, Ticks};
use crate::error::CurveError;

/// Cubic polynomial c0 + c1*x + c2*x^2 + c3*x^3 over x in [0, width].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicSegment {
    /// Build a segment matching value and derivative at both endpoints.
    /// Fails only on non-finite input; zero width degenerates to the start
    /// point's value and slope.
    pub fn new(
        start_value: f32,
        start_derivative: f32,
        end_value: f32,
        end_derivative: f32,
        width: f32,
    ) -> Result<Self, CurveError> {
        let finite = start_value.is_finite()
            && start_derivative.is_finite()
            && end_value.is_finite()
            && end_derivative.is_finite()
            && width.is_finite();
        if !finite {
            return Err(CurveError::NonFiniteCubic);
        }
        Ok(Self::hermite(
            start_value,
            start_derivative,
            end_value,
            end_derivative,
            width,
        ))
    }

    /// Segment between two retained nodes. Node data is validated at ingest,
    /// so this path is infallible.
    pub fn from_nodes(a: &SplineNode, b: &SplineNode) -> Self {
        Self::hermite(
            a.value,
            a.derivative,
            b.value,
            b.derivative,
            (b.time - a.time) as f32,
        )
    }

    fn hermite(s: f32, sd: f32, e: f32, ed: f32, w: f32) -> Self {
        if w <= 0.0 {
            return Self {
                c0: s,
                c1: sd,
                c2: 0.0,
                c3: 0.0,
            };
        }
        let inv_w = 1.0 / w;
        Self {
            c0: s,
            c1: sd,
            c2: (3.0 * (e - s) * inv_w - 2.0 * sd - ed) * inv_w,
            c3: (2.0 * (s - e) * inv_w + sd + ed) * inv_w * inv_w,
        }
    }

    #[inline]
    pub fn evaluate(&self, x: f32) -> f32 {
        ((self.c3 * x + self.c2) * x + self.c1) * x + self.c0
    }

    #[inline]
    pub fn derivative(&self, x: f32) -> f32 {
        (3.0 * self.c3 * x + 2.0 * self.c2) * x + self.c1
    }
}

/// Evaluate the piecewise cubic through `nodes` at `time`, returning
/// (value, derivative). Outside the node range the boundary value is held
/// with zero derivative.
pub fn evaluate_nodes(nodes: &[SplineNode], time: Ticks) -> (f32, f32) {
    debug_assert!(!nodes.is_empty());
    let first = nodes[0];
    let last = nodes[nodes.len() - 1];
    if time < first.time {
        return (first.value, 0.0);
    }
    if time >= last.time {
        return (last.value, 0.0);
    }

    // First node at or after `time`; the previous node brackets it.
    let mut i = 1;
    while nodes[i].time < time {
        i += 1;
    }
    let pre = &nodes[i - 1];
    let post = &nodes[i];
    let cubic = CubicSegment::from_nodes(pre, post);
    let x = (time - pre.time) as f32;
    (cubic.evaluate(x), cubic.derivative(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn matches_endpoints_and_slopes() {
        let c = CubicSegment::new(1.0, 0.5, 3.0, -0.25, 8.0).unwrap();
        approx(c.evaluate(0.0), 1.0, 1e-6);
        approx(c.derivative(0.0), 0.5, 1e-6);
        approx(c.evaluate(8.0), 3.0, 1e-4);
        approx(c.derivative(8.0), -0.25, 1e-4);
    }

    #[test]
    fn zero_width_degenerates_to_start() {
        let c = CubicSegment::new(2.0, 1.0, 5.0, 0.0, 0.0).unwrap();
        approx(c.evaluate(0.0), 2.0, 1e-6);
        approx(c.derivative(0.0), 1.0, 1e-6);
    }

    #[test]
    fn rejects_non_finite_input() {
        assert_eq!(
            CubicSegment::new(f32::NAN, 0.0, 1.0, 0.0, 1.0),
            Err(CurveError::NonFiniteCubic)
        );
        assert_eq!(
            CubicSegment::new(0.0, f32::INFINITY, 1.0, 0.0, 1.0),
            Err(CurveError::NonFiniteCubic)
        );
    }

    #[test]
    fn piecewise_evaluation_clamps_and_interpolates() {
        let nodes = vec![
            SplineNode::new(0, 0.0, 0.0),
            SplineNode::new(10, 1.0, 0.0),
            SplineNode::new(20, 3.0, 0.0),
        ];
        assert_eq!(evaluate_nodes(&nodes, -5), (0.0, 0.0));
        assert_eq!(evaluate_nodes(&nodes, 25), (3.0, 0.0));
        let (v, _) = evaluate_nodes(&nodes, 10);
        approx(v, 1.0, 1e-4);
        // Midpoint of a flat-ended hermite segment is the value average.
        let (v, d) = evaluate_nodes(&nodes, 15);
        approx(v, 2.0, 1e-4);
        assert!(d > 0.0);
    }
}
