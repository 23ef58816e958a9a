//! Ingest orchestration: the bone arena, per-channel fitting and pruning,
//! per-bone reduction, and final clip assembly.
//!
//! Expected call sequence per the ingest contract:
//! `alloc_bone` in skeleton order, then per animated operation
//! `alloc_channel` followed by either `add_constant` or one `add_curve` per
//! source key interval and a closing `prune_channel`; `reduce_bone` once a
//! bone's channels are complete; `into_clip` at the end.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assemble::{self, RepeatPreference};
use crate::data::{validate_samples, Bone, BoneIndex, Channel, Sample, SplineNode};
use crate::error::CurveError;
use crate::fit::fit_samples;
use crate::ops::{ChannelOp, OpId};
use crate::output::{build_clip, Clip, RepeatBreak};
use crate::prune::prune_nodes;
use crate::reduce::reduce_channels;
use crate::tolerances::Tolerances;

const DEGREES_PER_RADIAN: f32 = 57.29578;

/// Index of a channel within its bone.
pub type ChannelId = usize;

/// Assembly options for [`ClipBuilder::into_clip`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipOptions {
    pub repeat: RepeatPreference,
    /// Keep the source's start tick instead of shifting the clip to 0.
    pub preserve_start_time: bool,
    /// Leave channels that end early as-is instead of padding them flat to
    /// the common end time.
    pub stagger_end_times: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            repeat: RepeatPreference::IfRepeatable,
            preserve_start_time: false,
            stagger_end_times: false,
        }
    }
}

/// Builds one compressed clip from densely-sampled channels.
#[derive(Debug)]
pub struct ClipBuilder {
    bones: Vec<Bone>,
    tolerances: Tolerances,
    root_bones_only: bool,
}

impl ClipBuilder {
    pub fn new(tolerances: Tolerances, root_bones_only: bool) -> Self {
        Self {
            bones: Vec::new(),
            tolerances,
            root_bones_only,
        }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Append a bone. Parents must already exist, keeping the arena a tree.
    pub fn alloc_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneIndex>,
    ) -> Result<BoneIndex, CurveError> {
        if let Some(p) = parent {
            if p >= self.bones.len() {
                return Err(CurveError::BoneOutOfRange(p));
            }
        }
        self.bones.push(Bone::new(name, parent));
        Ok(self.bones.len() - 1)
    }

    /// Whether gathering should keep descending below `bone`. With
    /// root-bones-only, recursion stops at the first bone carrying channels.
    pub fn should_recurse(&self, bone: BoneIndex) -> bool {
        !self.root_bones_only
            || self
                .bones
                .get(bone)
                .map(|b| b.channels.is_empty())
                .unwrap_or(false)
    }

    pub fn alloc_channel(
        &mut self,
        bone: BoneIndex,
        op: ChannelOp,
        id: OpId,
    ) -> Result<ChannelId, CurveError> {
        let bone = self
            .bones
            .get_mut(bone)
            .ok_or(CurveError::BoneOutOfRange(bone))?;
        bone.channels.push(Channel::new(op, id));
        Ok(bone.channels.len() - 1)
    }

    /// Record a constant value for `channel`, replacing any prior nodes.
    pub fn add_constant(
        &mut self,
        bone: BoneIndex,
        channel: ChannelId,
        value: f32,
    ) -> Result<(), CurveError> {
        if !value.is_finite() {
            return Err(CurveError::NonFiniteSample { index: 0 });
        }
        let ch = self.channel_mut(bone, channel)?;
        ch.nodes.clear();
        ch.nodes.push(SplineNode::new(0, value, 0.0));
        Ok(())
    }

    /// Fit one span of dense samples and append the resulting nodes to
    /// `channel`. May be called repeatedly for consecutive spans; a span's
    /// first node is de-duplicated against the previous span's last.
    pub fn add_curve(
        &mut self,
        bone: BoneIndex,
        channel: ChannelId,
        samples: &[Sample],
    ) -> Result<(), CurveError> {
        validate_samples(samples)?;
        let tolerances = self.tolerances;
        let ch = self.channel_mut(bone, channel)?;
        fit_samples(samples, tolerances.for_op(ch.op), &mut ch.nodes);
        Ok(())
    }

    /// Remove redundant nodes from `channel` once all of its spans have been
    /// added, collapsing to a constant where possible.
    pub fn prune_channel(&mut self, bone: BoneIndex, channel: ChannelId) -> Result<(), CurveError> {
        let tolerances = self.tolerances;
        let ch = self.channel_mut(bone, channel)?;
        prune_nodes(
            &mut ch.nodes,
            tolerances.for_op(ch.op),
            tolerances.derivative_angle,
        );
        for (i, node) in ch.nodes.iter().enumerate() {
            debug!(
                "flat, {i}, {}, {}, {}",
                node.time, node.value, node.derivative
            );
        }
        Ok(())
    }

    pub fn num_nodes(&self, bone: BoneIndex, channel: ChannelId) -> Result<usize, CurveError> {
        let bone = self
            .bones
            .get(bone)
            .ok_or(CurveError::BoneOutOfRange(bone))?;
        let ch = bone
            .channels
            .get(channel)
            .ok_or(CurveError::ChannelOutOfRange(channel))?;
        Ok(ch.nodes.len())
    }

    /// Run the cross-channel reductions on `bone`'s finished channels.
    pub fn reduce_bone(&mut self, bone: BoneIndex) -> Result<(), CurveError> {
        let tolerances = self.tolerances;
        let bone = self
            .bones
            .get_mut(bone)
            .ok_or(CurveError::BoneOutOfRange(bone))?;
        reduce_channels(&mut bone.channels, &tolerances);
        Ok(())
    }

    /// Log a value table of every channel, rotations shown in degrees.
    pub fn log_channels(&self) {
        debug!(
            "{:>30} {:>16} {:>11} values",
            "bone name", "operation", "time range"
        );
        for bone in &self.bones {
            for channel in &bone.channels {
                let factor = if channel.op.is_rotate() {
                    DEGREES_PER_RADIAN
                } else {
                    1.0
                };
                let range = if channel.is_constant() {
                    "constant".to_string()
                } else {
                    format!(
                        "{}~{}",
                        channel.nodes[0].time,
                        channel.nodes[channel.nodes.len() - 1].time
                    )
                };
                let values: Vec<String> = channel
                    .nodes
                    .iter()
                    .map(|n| format!("{:.2}", factor * n.value))
                    .collect();
                debug!(
                    "{:>30} {:>16} {:>11} {}",
                    bone.base_name(),
                    channel.op,
                    range,
                    values.join(" ")
                );
            }
        }
    }

    /// Normalize times, pad end times, decide looping, and hand the result to
    /// the encoder.
    pub fn into_clip(mut self, name: impl Into<String>, options: &ClipOptions) -> Clip {
        if !options.preserve_start_time {
            let start = assemble::min_animated_time(&self.bones);
            assemble::shift_time(&mut self.bones, -start);
        }
        if !options.stagger_end_times {
            let end = assemble::max_animated_time(&self.bones);
            assemble::extend_channels_to_time(&mut self.bones, end);
        }

        let (repeats, broken) =
            assemble::decide_repeat(&self.bones, options.repeat, &self.tolerances);
        let repeat_break = broken.map(|(bone_idx, channel_idx)| RepeatBreak {
            bone: self.bones[bone_idx].base_name().to_string(),
            op: self.bones[bone_idx].channels[channel_idx].op,
        });

        let time_span = (
            assemble::min_animated_time(&self.bones),
            assemble::max_animated_time(&self.bones),
        );
        build_clip(name.into(), self.bones, repeats, repeat_break, time_span)
    }

    fn channel_mut(
        &mut self,
        bone: BoneIndex,
        channel: ChannelId,
    ) -> Result<&mut Channel, CurveError> {
        let bone = self
            .bones
            .get_mut(bone)
            .ok_or(CurveError::BoneOutOfRange(bone))?;
        bone.channels
            .get_mut(channel)
            .ok_or(CurveError::ChannelOutOfRange(channel))
    }
}
