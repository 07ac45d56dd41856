//! Scalar helpers and nalgebra extensions shared by every stage
//!
//! `core` has no `sqrt`, `atan2` or `round` for `f32`, so these wrappers go
//! through nalgebra's `ComplexField` / `RealField` implementations.

use nalgebra::{ComplexField, RealField, Vector3};

/// Mathematical constants
pub const PI: f32 = core::f32::consts::PI;
pub const TAU: f32 = core::f32::consts::TAU;
pub const DEG_TO_RAD: f32 = PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / PI;

/// Linear interpolation from `from` to `to` by `t` (unclamped)
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Where `value` sits between `from` and `to`, as an unclamped fraction
#[inline]
pub fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    (value - from) / (to - from)
}

/// Maps `value` from `from_a..from_b` onto `to_a..to_b`, clamping to the target range
#[inline]
pub fn remap(value: f32, from_a: f32, from_b: f32, to_a: f32, to_b: f32) -> f32 {
    to_a + (to_b - to_a) * clamp(inverse_lerp(from_a, from_b, value), 0.0, 1.0)
}

#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[inline]
pub fn sqrt(x: f32) -> f32 {
    <f32 as ComplexField>::sqrt(x)
}

#[inline]
pub fn atan2(y: f32, x: f32) -> f32 {
    <f32 as RealField>::atan2(y, x)
}

/// Rounds half away from zero
#[inline]
pub fn round(x: f32) -> f32 {
    <f32 as ComplexField>::round(x)
}

#[inline]
pub fn ceil(x: f32) -> f32 {
    <f32 as ComplexField>::ceil(x)
}

#[inline]
pub fn abs(x: f32) -> f32 {
    <f32 as ComplexField>::abs(x)
}

/// Sign of `x` as -1, 0 or 1. Unlike `signum`, zero maps to zero.
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Magnitude of `magnitude` with the sign bit of `sign`
#[inline]
pub fn copysign(magnitude: f32, sign: f32) -> f32 {
    if sign.is_sign_negative() {
        -abs(magnitude)
    } else {
        abs(magnitude)
    }
}

/// Wraps an angle difference into (-π, π]
pub fn wrap_delta_angle(angle: f32) -> f32 {
    let mut wrapped = (angle + PI) % TAU;
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    wrapped -= PI;

    // fold the open end back so -π reports as π
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Cubic ease-out: fast start, settles at 1
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    1.0 + t * t * t
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn safe_normalize(&self) -> Vector3<f32> {
        let magnitude = self.norm();
        if magnitude > 0.0 {
            *self / magnitude
        } else {
            Vector3::zeros()
        }
    }
}
