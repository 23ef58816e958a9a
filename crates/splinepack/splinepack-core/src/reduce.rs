//! Cross-channel algebra within one bone: uniform-scale folding, channel
//! summation, and identity-constant elimination.

use log::debug;

use crate::cubic::evaluate_nodes;
use crate::data::{Channel, SplineNode};
use crate::ops::ChannelOp;
use crate::prune::equal_nodes;
use crate::tolerances::Tolerances;

const fn op_bit(op: ChannelOp) -> u32 {
    1 << op as u32
}

const SCALE_XYZ_BITS: u32 =
    op_bit(ChannelOp::ScaleX) | op_bit(ChannelOp::ScaleY) | op_bit(ChannelOp::ScaleZ);

/// True if the three channels starting at `ch` are scale-x/y/z in any order
/// with pairwise-equal node sequences, i.e. replaceable by one uniform scale.
fn uniform_scale_channels(channels: &[Channel], ch: usize, tolerances: &Tolerances) -> bool {
    if ch + 2 >= channels.len() {
        return false;
    }
    let c0 = &channels[ch];
    let c1 = &channels[ch + 1];
    let c2 = &channels[ch + 2];

    if op_bit(c0.op) | op_bit(c1.op) | op_bit(c2.op) != SCALE_XYZ_BITS {
        return false;
    }
    if c0.nodes.len() != c1.nodes.len() || c0.nodes.len() != c2.nodes.len() {
        return false;
    }

    let tolerance = tolerances.scale;
    let da = tolerances.derivative_angle;
    for i in 0..c0.nodes.len() {
        let v0 = &c0.nodes[i];
        let v1 = &c1.nodes[i];
        let v2 = &c2.nodes[i];
        let all_equal = equal_nodes(v0, v1, tolerance, da)
            && equal_nodes(v0, v2, tolerance, da)
            && equal_nodes(v1, v2, tolerance, da);
        if !all_equal {
            return false;
        }
    }
    true
}

/// Later channel that `ch` may be summed with, if any. Rotations must be
/// strictly adjacent; translations and scales tolerate only intervening
/// channels of their own broad kind.
fn summable_channel(channels: &[Channel], ch: usize) -> Option<usize> {
    let ch_op = channels[ch].op;
    for id in ch + 1..channels.len() {
        let id_op = channels[id].op;
        if id_op == ch_op {
            return Some(id);
        }
        if ch_op.is_rotate() {
            return None;
        }
        if ch_op.is_translate() && !id_op.is_translate() {
            return None;
        }
        if ch_op.is_scale() && !id_op.is_scale() {
            return None;
        }
    }
    None
}

/// Sum the curves of `ch_a` and `ch_b`, leaving the result in `ch_a`.
///
/// Walks both node sequences by time: each output node takes the earlier-time
/// key, with the other sequence's interpolated value and derivative added.
/// Coincident times advance both sequences once so no duplicate key is
/// emitted. A single-key operand acts as a constant: it folds its value into
/// every key of the other sequence and contributes no keys of its own (this
/// assumes single-key curves hold their value for all time).
fn sum_channels(channels: &mut [Channel], ch_a: usize, ch_b: usize) {
    let nodes_a = std::mem::take(&mut channels[ch_a].nodes);
    let nodes_b = channels[ch_b].nodes.clone();
    debug_assert!(!nodes_a.is_empty() && !nodes_b.is_empty());

    let mut ia = 0usize;
    let mut ib = 0usize;
    let end_a = nodes_a.len();
    let end_b = nodes_b.len();
    if end_a == 1 {
        ia = end_a;
    } else if end_b == 1 {
        ib = end_b;
    }

    let mut sum = Vec::with_capacity(end_a + end_b);
    while ia < end_a || ib < end_b {
        let output_a = ia < end_a && (ib >= end_b || nodes_a[ia].time <= nodes_b[ib].time);
        let (node, other) = if output_a {
            (&nodes_a[ia], &nodes_b[..])
        } else {
            (&nodes_b[ib], &nodes_a[..])
        };
        let (value, derivative) = evaluate_nodes(other, node.time);
        sum.push(SplineNode::new(
            node.time,
            node.value + value,
            node.derivative + derivative,
        ));

        if ia < end_a && ib < end_b && nodes_a[ia].time == nodes_b[ib].time {
            ia += 1;
            ib += 1;
        } else if output_a {
            ia += 1;
        } else {
            ib += 1;
        }
    }

    channels[ch_a].nodes = sum;
}

/// Collapse, sum, and drop channels in place, then restore ascending id
/// order. Iterates from the end so erase indices stay stable.
pub fn reduce_channels(channels: &mut Vec<Channel>, tolerances: &Tolerances) {
    let mut ch = channels.len();
    while ch > 0 {
        ch -= 1;

        if uniform_scale_channels(channels, ch, tolerances) {
            debug!(
                "collapsing scale x, y, z channels {}~{} into one scale-uniformly channel",
                ch,
                ch + 2
            );
            let op = channels[ch].op;
            channels[ch].id = channels[ch].id.to_uniform_scale(op);
            channels[ch].op = ChannelOp::ScaleUniform;
            channels.drain(ch + 1..ch + 3);
        }

        if let Some(other) = summable_channel(channels, ch) {
            debug!("summing {} channels {} and {}", channels[ch].op, ch, other);
            sum_channels(channels, ch, other);
            channels.remove(other);
        }

        // Summing or folding can leave a constant at the identity value,
        // which contributes nothing to the transform.
        if channels[ch].nodes.len() == 1
            && tolerances.is_identity(channels[ch].op, channels[ch].nodes[0].value)
        {
            debug!("omitting constant {} channel {}", channels[ch].op, ch);
            channels.remove(ch);
        }
    }

    // Deterministic order regardless of which reductions fired.
    channels.sort_by_key(|c| c.id);
}
