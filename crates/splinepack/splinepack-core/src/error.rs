//! Error type for malformed ingest input.
//!
//! The compression passes themselves never fail on well-formed data: fitting
//! always terminates, pruning is a pure reduction, and channel reductions
//! degrade to no-ops when nothing matches. Errors surface only at the ingest
//! boundary.

use thiserror::Error;

use crate::data::Ticks;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("curve fitting requires at least two samples, got {0}")]
    TooFewSamples(usize),

    #[error("sample {index} has a non-finite value or derivative")]
    NonFiniteSample { index: usize },

    #[error("sample {index} at time {time} precedes its predecessor")]
    NonMonotonicTime { index: usize, time: Ticks },

    #[error("cubic endpoints must be finite")]
    NonFiniteCubic,

    #[error("bone index {0} out of range")]
    BoneOutOfRange(usize),

    #[error("channel index {0} out of range")]
    ChannelOutOfRange(usize),
}
