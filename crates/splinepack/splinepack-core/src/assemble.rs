//! Whole-skeleton passes: time normalization, end-time padding, and the
//! repeat decision.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::data::{Bone, BoneIndex, SplineNode, Ticks};
use crate::tolerances::{derivative_angle, Tolerances};

/// Whether the finished clip should loop back to its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatPreference {
    Never,
    Always,
    IfRepeatable,
}

/// Shift all node times in all channels by `time_offset`. Constant channels
/// are shifted too; their single node's time is not meaningful.
pub fn shift_time(bones: &mut [Bone], time_offset: Ticks) {
    if time_offset == 0 {
        return;
    }
    info!("shifting animation by {time_offset} ticks");
    for bone in bones.iter_mut() {
        for channel in &mut bone.channels {
            for node in &mut channel.nodes {
                node.time += time_offset;
            }
        }
    }
}

/// Extend every non-constant channel ending before `end_time` with a flat
/// continuation: a zero-derivative duplicate at its own last time if the end
/// slope is nonzero, then a zero-derivative duplicate at `end_time`.
pub fn extend_channels_to_time(bones: &mut [Bone], end_time: Ticks) {
    for bone in bones.iter_mut() {
        for channel in &mut bone.channels {
            if channel.is_constant() {
                continue;
            }
            let back = *channel.nodes.last().expect("non-constant channel");
            if back.time >= end_time {
                continue;
            }
            // Without this the gap would inherit the final slope.
            if back.derivative != 0.0 {
                channel
                    .nodes
                    .push(SplineNode::new(back.time, back.value, 0.0));
            }
            channel
                .nodes
                .push(SplineNode::new(end_time, back.value, 0.0));
        }
    }
}

/// Latest node time across all non-constant channels; 0 if none.
pub fn max_animated_time(bones: &[Bone]) -> Ticks {
    bones
        .iter()
        .flat_map(|b| &b.channels)
        .filter(|c| !c.is_constant())
        .filter_map(|c| c.nodes.last().map(|n| n.time))
        .max()
        .unwrap_or(0)
}

/// Earliest node time across all non-constant channels; may be negative.
/// 0 if there are no non-constant channels.
pub fn min_animated_time(bones: &[Bone]) -> Ticks {
    bones
        .iter()
        .flat_map(|b| &b.channels)
        .filter(|c| !c.is_constant())
        .filter_map(|c| c.nodes.first().map(|n| n.time))
        .min()
        .unwrap_or(0)
}

/// First channel whose start and end don't match within tolerance, as
/// (bone index, channel index). `None` means every channel can loop.
pub fn first_non_repeating(
    bones: &[Bone],
    tolerances: &Tolerances,
) -> Option<(BoneIndex, usize)> {
    for (bone_idx, bone) in bones.iter().enumerate() {
        for (channel_idx, channel) in bone.channels.iter().enumerate() {
            let (Some(start), Some(end)) = (channel.nodes.first(), channel.nodes.last()) else {
                continue;
            };
            let diff_val = (start.value - end.value).abs();
            let diff_derivative_angle =
                derivative_angle(start.derivative - end.derivative).abs();

            let tolerance = tolerances.for_op(channel.op);
            let same = diff_val < tolerance
                && diff_derivative_angle < tolerances.repeat_derivative_angle;
            if !same {
                return Some((bone_idx, channel_idx));
            }
        }
    }
    None
}

/// Decide whether the clip repeats. Returns the decision plus the first
/// disqualifying channel, if any, for caller diagnostics. `Always` on
/// non-repeating data still marks the clip repeating but warns.
pub fn decide_repeat(
    bones: &[Bone],
    preference: RepeatPreference,
    tolerances: &Tolerances,
) -> (bool, Option<(BoneIndex, usize)>) {
    if preference == RepeatPreference::Never {
        return (false, None);
    }

    let broken = first_non_repeating(bones, tolerances);
    let repeat = preference == RepeatPreference::Always || broken.is_none();

    match preference {
        RepeatPreference::Always => {
            if let Some((bone_idx, channel_idx)) = broken {
                let bone = &bones[bone_idx];
                warn!(
                    "animation marked as repeating (as requested), but it does not repeat \
                     on bone {}'s `{}` channel",
                    bone.base_name(),
                    bone.channels[channel_idx].op
                );
            }
        }
        RepeatPreference::IfRepeatable => {
            debug!(
                "{}",
                if repeat {
                    "animation repeats"
                } else {
                    "animation does not repeat"
                }
            );
        }
        RepeatPreference::Never => unreachable!(),
    }

    (repeat, broken)
}
