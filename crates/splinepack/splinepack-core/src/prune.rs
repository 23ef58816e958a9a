//! Removal of keyframes that neighboring cubics already reproduce.

use crate::cubic::CubicSegment;
use crate::data::SplineNode;
use crate::tolerances::derivative_angle;

/// True when `a` and `b` sit at the same time with matching value and slope
/// (slopes compared as angles).
pub(crate) fn equal_nodes(
    a: &SplineNode,
    b: &SplineNode,
    tolerance: f32,
    derivative_angle_tolerance: f32,
) -> bool {
    a.time == b.time
        && (a.value - b.value).abs() < tolerance
        && derivative_angle(a.derivative - b.derivative).abs() < derivative_angle_tolerance
}

/// True when every node strictly between the first and last of `run` can be
/// dropped without the direct cubic drifting past tolerance. Coincident equal
/// endpoints make the whole interior redundant outright.
fn interior_nodes_redundant(
    run: &[SplineNode],
    tolerance: f32,
    derivative_angle_tolerance: f32,
) -> bool {
    let start = run[0];
    let end = run[run.len() - 1];
    if equal_nodes(&start, &end, tolerance, derivative_angle_tolerance) {
        return true;
    }

    let cubic = CubicSegment::from_nodes(&start, &end);
    for mid in &run[1..run.len() - 1] {
        let x = (mid.time - start.time) as f32;
        let value_err = (cubic.evaluate(x) - mid.value).abs();
        let angle_err = derivative_angle(cubic.derivative(x) - mid.derivative).abs();
        if value_err >= tolerance || angle_err >= derivative_angle_tolerance {
            return false;
        }
    }
    true
}

/// Prune redundant interior nodes, then collapse a flat two-node channel to a
/// single constant node.
///
/// Greedy maximal runs: from each retained node, extend rightward while the
/// interior stays redundant against the direct cubic, keep only the run's
/// endpoints, then continue from the run's end.
pub fn prune_nodes(nodes: &mut Vec<SplineNode>, tolerance: f32, derivative_angle_tolerance: f32) {
    if nodes.len() > 2 {
        let mut retained: Vec<SplineNode> = Vec::with_capacity(nodes.len());
        let mut i = 0;
        while i < nodes.len() {
            retained.push(nodes[i]);
            let mut run_end = i + 1;
            let mut j = i + 2;
            while j < nodes.len()
                && interior_nodes_redundant(&nodes[i..=j], tolerance, derivative_angle_tolerance)
            {
                run_end = j;
                j += 1;
            }
            i = run_end;
        }
        *nodes = retained;
    }

    // A two-node channel that is level and flat at both ends is a constant;
    // keep one node so the emitter knows to output a constant value.
    let is_const = nodes.len() == 2
        && (nodes[0].value - nodes[1].value).abs() < tolerance
        && derivative_angle(nodes[0].derivative).abs() < derivative_angle_tolerance
        && derivative_angle(nodes[1].derivative).abs() < derivative_angle_tolerance;
    if is_const {
        nodes.truncate(1);
    }
}
