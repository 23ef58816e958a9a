//! Adaptive segmentation: fit dense samples with as few cubics as tolerance
//! allows.

use crate::cubic::CubicSegment;
use crate::data::{Sample, SplineNode};

/// Fit `samples` and append the retained segment endpoints to `nodes`.
///
/// A single cubic is built from the first and last sample. If the worst
/// interior deviation exceeds `tolerance`, the range is split at that sample
/// and both halves are fitted independently; each split strictly shrinks the
/// range, terminating at two samples (always accepted). The cubic is shifted
/// to start at x = 0 to keep float precision over long clips.
///
/// Callers must pass at least two validated samples (see ingest validation).
pub fn fit_samples(samples: &[Sample], tolerance: f32, nodes: &mut Vec<SplineNode>) {
    debug_assert!(samples.len() >= 2);
    let first = samples[0];
    let last = samples[samples.len() - 1];
    let cubic = CubicSegment::from_nodes(
        &SplineNode::new(first.time, first.value, first.derivative),
        &SplineNode::new(last.time, last.value, last.derivative),
    );

    // Worst interior deviation. Strict `>` keeps the earliest worst index.
    let mut worst_idx = 0usize;
    let mut worst_diff = 0.0f32;
    for (i, s) in samples.iter().enumerate().take(samples.len() - 1).skip(1) {
        let x = (s.time - first.time) as f32;
        let diff = (cubic.evaluate(x) - s.value).abs();
        if diff > worst_diff {
            worst_idx = i;
            worst_diff = diff;
        }
    }

    // worst_idx == 0 covers both "no interior sample" and duplicate-time
    // degenerate ranges, which must never split.
    if worst_idx > 0 && worst_diff > tolerance {
        fit_samples(&samples[..=worst_idx], tolerance, nodes);
        fit_samples(&samples[worst_idx..], tolerance, nodes);
        return;
    }

    let start = SplineNode::new(first.time, first.value, first.derivative);
    let end = SplineNode::new(last.time, last.value, last.derivative);

    // The start node usually equals the previous segment's end node exactly;
    // skip it then. This is the only de-duplication during fitting.
    if nodes.last() != Some(&start) {
        nodes.push(start);
    }
    nodes.push(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_samples_always_accept() {
        let samples = [Sample::new(0, 0.0, 0.1), Sample::new(10, 1.0, 0.1)];
        let mut nodes = Vec::new();
        fit_samples(&samples, 0.01, &mut nodes);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], SplineNode::new(0, 0.0, 0.1));
        assert_eq!(nodes[1], SplineNode::new(10, 1.0, 0.1));
    }

    #[test]
    fn boundary_node_not_duplicated_across_calls() {
        let a = [Sample::new(0, 0.0, 0.0), Sample::new(10, 1.0, 0.0)];
        let b = [Sample::new(10, 1.0, 0.0), Sample::new(20, 2.0, 0.0)];
        let mut nodes = Vec::new();
        fit_samples(&a, 0.01, &mut nodes);
        fit_samples(&b, 0.01, &mut nodes);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1], SplineNode::new(10, 1.0, 0.0));
    }

    #[test]
    fn splits_at_worst_sample() {
        // A spike the single cubic cannot reproduce forces a split at t=10.
        let samples = [
            Sample::new(0, 0.0, 0.0),
            Sample::new(10, 5.0, 0.0),
            Sample::new(20, 0.0, 0.0),
        ];
        let mut nodes = Vec::new();
        fit_samples(&samples, 0.01, &mut nodes);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].time, 10);
        assert_eq!(nodes[1].value, 5.0);
    }
}
