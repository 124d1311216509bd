//! Easing curves for tweened motion.
//!
//! [`Easing::CubicBezier`] follows the CSS `cubic-bezier()` timing function:
//! the control points' x coordinates must lie in `[0, 1]`, while the y
//! coordinates may overshoot to produce anticipation or bounce.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A timing curve mapping linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// CSS `ease`.
    #[default]
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// `1 - (1 - t)^3`.
    EaseOutCubic,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier([f64; 4]),
}

impl Easing {
    /// Overshooting back-out curve used for springy presses.
    pub const BACK_OUT: Self = Self::CubicBezier([0.175, 0.885, 0.32, 1.275]);

    /// Anticipating curve that dips below zero and overshoots past one.
    pub const ELASTIC: Self = Self::CubicBezier([0.68, -0.6, 0.32, 1.6]);

    /// Evaluates the curve at `t`, clamping `t` into `[0, 1]` first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::CubicBezier([x1, y1, x2, y2]) => bezier(x1, y1, x2, y2, t),
        }
    }

    /// Checks that the control points describe a valid timing function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when an x coordinate is
    /// outside `[0, 1]` or any coordinate is not finite.
    pub fn validate(&self) -> Result<()> {
        if let Self::CubicBezier([x1, y1, x2, y2]) = *self {
            for x in [x1, x2] {
                if !(0.0..=1.0).contains(&x) {
                    return Err(Error::InvalidConfiguration {
                        option: "easing",
                        value: x,
                        expected: "bezier x coordinates within [0, 1]",
                    });
                }
            }
            for y in [y1, y2] {
                if !y.is_finite() {
                    return Err(Error::InvalidConfiguration {
                        option: "easing",
                        value: y,
                        expected: "finite bezier y coordinates",
                    });
                }
            }
        }
        Ok(())
    }
}

// Component of a cubic bezier with endpoints fixed at 0 and 1.
fn component(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn component_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // Newton-Raphson on x(s) = t, falling back to bisection when the slope
    // flattens out.
    let mut s = t;
    for _ in 0..8 {
        let err = component(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return component(y1, y2, s);
        }
        let slope = component_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = component(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    component(y1, y2, s)
}
