//! Emit contract: the in-memory clip tree handed to the external encoder.
//!
//! The core produces no wire or file format of its own. Each retained bone
//! carries its name, parent reference, and channels; each channel is either a
//! constant value or an ordered node list plus the value range it spans.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::{Bone, BoneIndex, SplineNode, Ticks};
use crate::ops::{ChannelOp, OpId};

/// Payload of an emitted channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CurveValue {
    Constant(f32),
    Spline {
        nodes: Vec<SplineNode>,
        /// [min, max] of node values, for the encoder's quantization.
        value_range: (f32, f32),
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelCurve {
    pub op: ChannelOp,
    pub id: OpId,
    pub value: CurveValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneCurves {
    /// Bone name with any namespace prefix stripped.
    pub name: String,
    pub parent: Option<BoneIndex>,
    pub channels: Vec<ChannelCurve>,
}

/// Bone + channel that disqualified looping, for caller diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepeatBreak {
    pub bone: String,
    pub op: ChannelOp,
}

/// Finished compression result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    pub bones: Vec<BoneCurves>,
    pub repeats: bool,
    /// Set when any channel's start and end don't match within tolerance.
    pub repeat_break: Option<RepeatBreak>,
    /// Overall [min, max] animated time span in ticks.
    pub time_span: (Ticks, Ticks),
}

fn value_range(nodes: &[SplineNode]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for n in nodes {
        min = min.min(n.value);
        max = max.max(n.value);
    }
    (min, max)
}

pub(crate) fn build_clip(
    name: String,
    bones: Vec<Bone>,
    repeats: bool,
    repeat_break: Option<RepeatBreak>,
    time_span: (Ticks, Ticks),
) -> Clip {
    let mut out_bones = Vec::with_capacity(bones.len());
    for bone in &bones {
        let mut channels = Vec::with_capacity(bone.channels.len());
        for channel in &bone.channels {
            debug_assert!(!channel.nodes.is_empty());
            let value = if channel.is_constant() {
                CurveValue::Constant(channel.nodes[0].value)
            } else {
                // Negative times survive the shift when the caller preserved
                // the start time; the encoder will clamp, so warn here.
                let start = channel.nodes[0].time;
                if start < 0 {
                    warn!(
                        "{} ({}) starts at negative time {start}",
                        bone.base_name(),
                        channel.op
                    );
                }
                CurveValue::Spline {
                    nodes: channel.nodes.clone(),
                    value_range: value_range(&channel.nodes),
                }
            };
            channels.push(ChannelCurve {
                op: channel.op,
                id: channel.id,
                value,
            });
        }
        out_bones.push(BoneCurves {
            name: bone.base_name().to_string(),
            parent: bone.parent,
            channels,
        });
    }

    Clip {
        name,
        bones: out_bones,
        repeats,
        repeat_break,
        time_span,
    }
}
