//! Numeric primitives for the animation layer.
//!
//! Everything here is a pure function: no state, no failure modes.
//! Callers clamp `t` themselves when an out-of-range value would be
//! meaningless; the formulas are defined for all reals.

/// Clamp `v` into `[lo, hi]`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Linear interpolation: `a + (b - a) * t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic ease-out: `1 - (1 - t)^3`.
///
/// Monotonic on `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Frame-rate-independent smoothing factor: `1 - e^(-rate * dt)`.
///
/// Feeding the result to a lerp/slerp each frame converges on the target
/// at the same speed regardless of frame rate.
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
