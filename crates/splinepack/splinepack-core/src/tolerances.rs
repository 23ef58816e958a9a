//! Per-category deviation tolerances.
//!
//! Tolerances bound how far the compressed curves may drift from the source
//! motion. They are supplied by configuration and held fixed for the whole
//! run; every pass derives its allowed deviation from the operation kind.

use serde::{Deserialize, Serialize};

use crate::ops::ChannelOp;

/// Half a percent.
pub const DEFAULT_SCALE_TOLERANCE: f32 = 0.005;

/// 0.5 degrees in radians.
pub const DEFAULT_ROTATE_TOLERANCE: f32 = 0.00873;

/// Totally arbitrary. TODO: make a percentage of the model size.
pub const DEFAULT_TRANSLATE_TOLERANCE: f32 = 0.01;

/// 0.5 degrees in radians.
pub const DEFAULT_DERIVATIVE_ANGLE_TOLERANCE: f32 = 0.00873;

/// 10 degrees in radians.
pub const DEFAULT_REPEAT_DERIVATIVE_ANGLE_TOLERANCE: f32 = 0.1745;

/// Convert a derivative to its angle in x/y space.
///   derivative 0 ==> angle 0
///   derivative 1 ==> angle 45 degrees
///   derivative +inf ==> angle 90 degrees
/// Returns radians in [-pi/2, pi/2]. Comparing slopes by angle keeps steep
/// slopes from dominating the tolerance check.
#[inline]
pub fn derivative_angle(derivative: f32) -> f32 {
    derivative.atan()
}

/// Maximum acceptable deviation per operation category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Unitless scale factor deviation.
    pub scale: f32,
    /// Radians.
    pub rotate: f32,
    /// Scene distance units.
    pub translate: f32,
    /// Radians; bound on the angle between stored and reconstructed slopes.
    pub derivative_angle: f32,
    /// Radians; looser slope bound used only for the repeat decision.
    pub repeat_derivative_angle: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE_TOLERANCE,
            rotate: DEFAULT_ROTATE_TOLERANCE,
            translate: DEFAULT_TRANSLATE_TOLERANCE,
            derivative_angle: DEFAULT_DERIVATIVE_ANGLE_TOLERANCE,
            repeat_derivative_angle: DEFAULT_REPEAT_DERIVATIVE_ANGLE_TOLERANCE,
        }
    }
}

impl Tolerances {
    /// Allowed value deviation for one operation kind.
    pub fn for_op(&self, op: ChannelOp) -> f32 {
        if op.is_rotate() {
            self.rotate
        } else if op.is_translate() {
            self.translate
        } else {
            self.scale
        }
    }

    /// True when `value` equals the operation's identity within tolerance.
    pub fn is_identity(&self, op: ChannelOp, value: f32) -> bool {
        (value - op.identity_value()).abs() < self.for_op(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn for_op_maps_categories() {
        let t = Tolerances::default();
        assert_eq!(t.for_op(ChannelOp::RotateY), t.rotate);
        assert_eq!(t.for_op(ChannelOp::TranslateZ), t.translate);
        assert_eq!(t.for_op(ChannelOp::ScaleX), t.scale);
        assert_eq!(t.for_op(ChannelOp::ScaleUniform), t.scale);
    }

    #[test]
    fn identity_respects_category_tolerance() {
        let t = Tolerances::default();
        assert!(t.is_identity(ChannelOp::TranslateX, 0.009));
        assert!(!t.is_identity(ChannelOp::TranslateX, 0.011));
        assert!(t.is_identity(ChannelOp::ScaleUniform, 1.004));
        assert!(!t.is_identity(ChannelOp::ScaleUniform, 1.006));
    }

    #[test]
    fn derivative_angle_basics() {
        assert_eq!(derivative_angle(0.0), 0.0);
        assert!((derivative_angle(1.0) - FRAC_PI_4).abs() < 1e-6);
        assert!(derivative_angle(-2.0) < 0.0);
    }
}
