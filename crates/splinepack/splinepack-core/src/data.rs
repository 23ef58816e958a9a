//! Core data model: samples, spline nodes, channels, bones.

use serde::{Deserialize, Serialize};

use crate::cubic;
use crate::error::CurveError;
use crate::ops::{ChannelOp, OpId};

/// Time used for animation curves. Integral ticks so long animations don't
/// lose precision toward the end.
pub type Ticks = i32;

/// Index of a bone within a clip's bone arena. Parents always reference an
/// earlier index, so the arena forms a tree without back-pointers.
pub type BoneIndex = usize;

/// One dense source sample. Derivatives are in value-units per tick; the
/// sampler resolves left/right derivatives to one slope per sample (the first
/// sample of a span carries the right-hand derivative).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: Ticks,
    pub value: f32,
    pub derivative: f32,
}

impl Sample {
    pub fn new(time: Ticks, value: f32, derivative: f32) -> Self {
        Self {
            time,
            value,
            derivative,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.derivative.is_finite()
    }
}

/// A retained keyframe of a fitted curve. Equality is exact on all three
/// fields; the fitter relies on that to skip duplicate boundary nodes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineNode {
    pub time: Ticks,
    pub value: f32,
    pub derivative: f32,
}

impl SplineNode {
    pub fn new(time: Ticks, value: f32, derivative: f32) -> Self {
        Self {
            time,
            value,
            derivative,
        }
    }
}

/// The fitted/reduced curve for one scalar transform operation on one bone.
/// Node times are monotonically non-decreasing; a single node means the
/// channel holds a constant value and its derivative is meaningless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub op: ChannelOp,
    pub id: OpId,
    pub nodes: Vec<SplineNode>,
}

impl Channel {
    pub fn new(op: ChannelOp, id: OpId) -> Self {
        Self {
            op,
            id,
            nodes: Vec::new(),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Evaluate this channel's curve at `time`; see [`cubic::evaluate_nodes`].
    pub fn evaluate(&self, time: Ticks) -> (f32, f32) {
        cubic::evaluate_nodes(&self.nodes, time)
    }
}

/// One bone of the skeleton with its animated channels. Channels are kept in
/// ascending id order after reduction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneIndex>,
    pub channels: Vec<Channel>,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<BoneIndex>) -> Self {
        Self {
            name: name.into(),
            parent,
            channels: Vec::new(),
        }
    }

    /// Bone name with any `namespace:` prefix removed.
    pub fn base_name(&self) -> &str {
        match self.name.rfind(':') {
            Some(i) => &self.name[i + 1..],
            None => &self.name,
        }
    }
}

/// Ingest validation: at least two samples, finite data, non-decreasing
/// times. Duplicate times are allowed; the fitter never splits on them.
pub(crate) fn validate_samples(samples: &[Sample]) -> Result<(), CurveError> {
    if samples.len() < 2 {
        return Err(CurveError::TooFewSamples(samples.len()));
    }
    let mut last = samples[0].time;
    for (index, s) in samples.iter().enumerate() {
        if !s.is_finite() {
            return Err(CurveError::NonFiniteSample { index });
        }
        if s.time < last {
            return Err(CurveError::NonMonotonicTime {
                index,
                time: s.time,
            });
        }
        last = s.time;
    }
    Ok(())
}
