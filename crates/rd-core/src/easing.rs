//! Easing curves for the reel stop tween

use serde::{Deserialize, Serialize};

/// Deceleration curve applied to the stop interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Quadratic ease-out (gentle landing)
    EaseOutQuad,
    /// Cubic ease-out (default reel landing feel)
    #[default]
    EaseOutCubic,
    /// Exponential ease-out (hard brake)
    EaseOutExpo,
    /// Sine-based S-curve
    SCurve,
}

impl Easing {
    /// Apply the curve to a linear progress value (0.0-1.0)
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - (2.0_f64).powf(-10.0 * t)
                }
            }
            Easing::SCurve => (1.0 - (t * std::f64::consts::PI).cos()) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for curve in [
            Easing::Linear,
            Easing::EaseOutQuad,
            Easing::EaseOutCubic,
            Easing::EaseOutExpo,
            Easing::SCurve,
        ] {
            assert!(curve.apply(0.0).abs() < 1e-9, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-9, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_monotonic() {
        let curve = Easing::EaseOutCubic;
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = curve.apply(i as f64 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }
}
