//! Easing curves: map normalized time `t ∈ [0, 1]` to animation progress.
//!
//! Cubic Bézier curves are pinned at (0, 0) and (1, 1). Inverting `x(t)` uses a
//! sample table built at construction time, a binary search over the samples
//! for the bracketing interval, then bisection until the error is below
//! [`TOLERANCE`].

/// Number of `(t, x)` samples precomputed per curve.
const SAMPLE_COUNT: usize = 11;

/// Maximum `|x - x(t)|` accepted by the solver.
const TOLERANCE: f32 = 1e-6;

/// Bisection iteration cap. 2^-24 is below f32 precision for `t`.
const MAX_REFINE_STEPS: usize = 24;

/// An easing function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// `f(t) = t`.
    #[default]
    Linear,
    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// A custom curve.
    CubicBezier(CubicBezier),
    /// Discrete jumps at the end of each of `n` intervals (`n >= 1`).
    Steps(u32),
}

impl Easing {
    /// Evaluate the curve at `t`. Input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::Ease => CubicBezier::EASE.solve(t),
            Easing::EaseIn => CubicBezier::EASE_IN.solve(t),
            Easing::EaseOut => CubicBezier::EASE_OUT.solve(t),
            Easing::EaseInOut => CubicBezier::EASE_IN_OUT.solve(t),
            Easing::CubicBezier(curve) => curve.solve(t),
            Easing::Steps(count) => {
                let n = (*count).max(1) as f32;
                (t * n).floor() / n
            }
        }
    }

    /// Build a custom cubic Bézier easing. `x1` and `x2` are clamped to `[0, 1]`
    /// so the curve stays a function of x.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Easing::CubicBezier(CubicBezier::new(x1, y1, x2, y2))
    }

    /// Look up a curve by its CSS keyword.
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Easing::Linear),
            "ease" => Some(Easing::Ease),
            "ease-in" => Some(Easing::EaseIn),
            "ease-out" => Some(Easing::EaseOut),
            "ease-in-out" => Some(Easing::EaseInOut),
            _ => None,
        }
    }
}

/// A one-dimensional cubic Bézier timing curve with fixed end anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    /// `x(t)` at `t = i / (SAMPLE_COUNT - 1)`.
    samples: [f32; SAMPLE_COUNT],
}

impl CubicBezier {
    pub const EASE: CubicBezier = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: CubicBezier = CubicBezier::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: CubicBezier = CubicBezier::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);

    /// Create a curve from its two control points and precompute the sample table.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let x1 = clamp_unit(x1);
        let x2 = clamp_unit(x2);
        let mut samples = [0.0; SAMPLE_COUNT];
        let mut i = 0;
        while i < SAMPLE_COUNT {
            let t = i as f32 / (SAMPLE_COUNT - 1) as f32;
            samples[i] = bezier(x1, x2, t);
            i += 1;
        }
        Self { x1, y1, x2, y2, samples }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Eased progress for input `x`.
    pub fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.t_for_x(x);
        bezier(self.y1, self.y2, t)
    }

    /// Invert `x(t)`: find `t` such that `x(t) ≈ x`.
    fn t_for_x(&self, x: f32) -> f32 {
        // x(t) is monotonic for x1, x2 in [0, 1], so the samples are sorted.
        let upper = self.samples.partition_point(|&sample| sample < x);
        let upper = upper.clamp(1, SAMPLE_COUNT - 1);
        let step = 1.0 / (SAMPLE_COUNT - 1) as f32;

        let mut lo = (upper - 1) as f32 * step;
        let mut hi = upper as f32 * step;
        let mut t = lo + (hi - lo) * 0.5;

        for _ in 0..MAX_REFINE_STEPS {
            let error = bezier(self.x1, self.x2, t) - x;
            if error.abs() < TOLERANCE {
                break;
            }
            if error > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = lo + (hi - lo) * 0.5;
        }
        t
    }
}

const fn clamp_unit(v: f32) -> f32 {
    if v < 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}

/// One axis of a cubic Bézier anchored at 0 and 1:
/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`.
#[inline]
const fn bezier(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}
