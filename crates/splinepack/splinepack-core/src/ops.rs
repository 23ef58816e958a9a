//! Transform operation kinds and their stable ids.
//!
//! A channel animates exactly one scalar operation: a rotation about one
//! axis, a translation along one axis, a per-axis scale, or a uniform scale.
//! Ids identify the operation slot within a bone's transform stack and are
//! laid out consecutively for scale: scale-x, scale-y, scale-z,
//! scale-uniformly. The channel reducer relies on that layout when it folds
//! three per-axis scales into one uniform scale.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChannelOp {
    RotateX,
    RotateY,
    RotateZ,
    TranslateX,
    TranslateY,
    TranslateZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    ScaleUniform,
}

impl ChannelOp {
    pub fn is_rotate(self) -> bool {
        matches!(self, Self::RotateX | Self::RotateY | Self::RotateZ)
    }

    pub fn is_translate(self) -> bool {
        matches!(self, Self::TranslateX | Self::TranslateY | Self::TranslateZ)
    }

    pub fn is_scale(self) -> bool {
        matches!(
            self,
            Self::ScaleX | Self::ScaleY | Self::ScaleZ | Self::ScaleUniform
        )
    }

    /// Value that leaves the transform unchanged: 1 for scales, 0 otherwise.
    /// A constant channel stuck at this value can be dropped entirely.
    pub fn identity_value(self) -> f32 {
        if self.is_scale() {
            1.0
        } else {
            0.0
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RotateX => "rotate-x",
            Self::RotateY => "rotate-y",
            Self::RotateZ => "rotate-z",
            Self::TranslateX => "translate-x",
            Self::TranslateY => "translate-y",
            Self::TranslateZ => "translate-z",
            Self::ScaleX => "scale-x",
            Self::ScaleY => "scale-y",
            Self::ScaleZ => "scale-z",
            Self::ScaleUniform => "scale-uniformly",
        }
    }
}

impl fmt::Display for ChannelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable id of one operation slot in a bone's transform stack. Channels are
/// kept sorted by id after reduction so the emitted order is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpId(pub u16);

impl OpId {
    /// Retarget a per-axis scale id to its uniform-scale id. Scale ids are
    /// consecutive (x, y, z, uniform), so the offset depends only on the axis.
    pub fn to_uniform_scale(self, op: ChannelOp) -> OpId {
        match op {
            ChannelOp::ScaleX => OpId(self.0 + 3),
            ChannelOp::ScaleY => OpId(self.0 + 2),
            ChannelOp::ScaleZ => OpId(self.0 + 1),
            _ => self,
        }
    }
}
