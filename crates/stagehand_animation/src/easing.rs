//! Easing functions for keyframe playback
//!
//! Every named easing is a CSS timing function, so a headless playback and a
//! browser playing the same keyframes agree on intermediate values.

use std::fmt;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Control points of the equivalent `cubic-bezier()` curve.
    ///
    /// Returns `None` for `Linear`, which needs no solving.
    pub fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match *self {
            Easing::Linear => None,
            Easing::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Easing::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self.control_points() {
            None => t.clamp(0.0, 1.0),
            Some((x1, y1, x2, y2)) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Solve the curve for `x == t` and return its `y`.
///
/// Newton-Raphson first, bisection when the slope flattens out. Computed in
/// f64 so long animations don't wobble near the endpoints.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = target;
    let mut converged = false;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            converged = true;
            break;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    if !converged || !(0.0..=1.0).contains(&p) {
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        p = target;
        for _ in 0..32 {
            let x = bezier_sample(p, x1, x2);
            if (x - target).abs() < 1e-7 {
                break;
            }
            if x < target {
                lo = p;
            } else {
                hi = p;
            }
            p = (lo + hi) * 0.5;
        }
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) for a curve anchored at 0 and 1, in Horner form.
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// B'(t)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
