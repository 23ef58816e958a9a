//! splinepack-core (engine-agnostic)
//!
//! Compresses densely-sampled skeletal animation channels into a minimal
//! piecewise-cubic representation within configurable tolerances, then
//! algebraically collapses redundant or combinable channels:
//! - adaptive cubic fitting per channel (`fit`),
//! - redundant-keyframe pruning and constant collapse (`prune`),
//! - per-bone channel algebra: uniform-scale folding, summation, identity
//!   elimination (`reduce`),
//! - whole-skeleton time normalization and repeat detection (`assemble`).
//!
//! Extraction of raw samples from a source asset and binary encoding of the
//! result are external collaborators; see [`ClipBuilder`] for the ingest
//! surface and [`Clip`] for the emitted tree.

pub mod assemble;
pub mod builder;
pub mod cubic;
pub mod data;
pub mod error;
pub mod fit;
pub mod ops;
pub mod output;
pub mod prune;
pub mod reduce;
pub mod tolerances;

// Re-exports for consumers (extractors and encoders)
pub use assemble::RepeatPreference;
pub use builder::{ChannelId, ClipBuilder, ClipOptions};
pub use cubic::CubicSegment;
pub use data::{Bone, BoneIndex, Channel, Sample, SplineNode, Ticks};
pub use error::CurveError;
pub use ops::{ChannelOp, OpId};
pub use output::{BoneCurves, ChannelCurve, Clip, CurveValue, RepeatBreak};
pub use tolerances::Tolerances;
