//! Fixed-point math helpers
//!
//! All audio-rate arithmetic in Grit is Q15: deterministic, allocation
//! free, and saturating where the signal path can overflow. The mapping
//! helpers here are the integer workhorses behind every knob-to-range
//! conversion in the engine.

use crate::types::Q15;

/// Saturating Q15 addition
#[inline]
pub fn q15_add(a: Q15, b: Q15) -> Q15 {
    a.saturating_add(b)
}

/// Saturating Q15 subtraction
#[inline]
pub fn q15_sub(a: Q15, b: Q15) -> Q15 {
    a.saturating_sub(b)
}

/// Q15 multiplication (result scaled back by 2^15)
///
/// The only overflowing product is Q15_MIN * Q15_MIN, which is clamped.
#[inline]
pub fn q15_mul(a: Q15, b: Q15) -> Q15 {
    (((a as i32) * (b as i32)) >> 15).clamp(Q15::MIN as i32, Q15::MAX as i32) as Q15
}

/// Linear integer range mapping
///
/// Maps `x` from `[in_min, in_max]` onto `[out_min, out_max]` with 64-bit
/// intermediate math so 12-bit pot values can map onto sample counts
/// without overflow. A degenerate input range maps everything to
/// `out_min`.
#[inline]
pub fn map(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    let num = (x - in_min) as i64 * (out_max - out_min) as i64;
    out_min + (num / (in_max - in_min) as i64) as i32
}

/// Piecewise-linear curve over pot positions
///
/// Breakpoints must be in ascending input order. Inputs outside the
/// breakpoint range clamp to the end values. Used at UI rate only (the
/// pitch curve), so float output is fine here.
#[derive(Debug, Clone, Copy)]
pub struct CurveMap<const N: usize> {
    pub input: [i32; N],
    pub output: [f32; N],
}

impl<const N: usize> CurveMap<N> {
    /// Evaluate the curve at `x`
    pub fn at(&self, x: i32) -> f32 {
        if x <= self.input[0] {
            return self.output[0];
        }
        if x >= self.input[N - 1] {
            return self.output[N - 1];
        }
        for i in 1..N {
            if x <= self.input[i] {
                let span = (self.input[i] - self.input[i - 1]) as f32;
                let t = (x - self.input[i - 1]) as f32 / span;
                return self.output[i - 1] + t * (self.output[i] - self.output[i - 1]);
            }
        }
        self.output[N - 1]
    }
}
