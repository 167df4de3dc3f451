//! Transient shaper
//!
//! A one-pole low-pass tracks a running envelope of the signal; whatever
//! the envelope doesn't explain is "transient" and gets added back,
//! scaled by the shaping knob. The envelope state is shared by both
//! stereo channels, processed left then right on the same state
//! variable.

use crate::qmath::{map, q15_add, q15_mul, q15_sub};
use crate::types::{POT_MAX, POT_MIN, Q15, Q15_MAX};

/// Envelope time constant in seconds
const TAU: f32 = 1.5e-3;

/// One-pole transient exciter
pub struct TransientShaper {
    env: Q15,
    alpha: Q15,
}

impl TransientShaper {
    /// Create a shaper tuned for the given sample rate
    ///
    /// The smoothing coefficient is computed once here; the audio path
    /// never touches floats.
    pub fn new(sample_rate: u32) -> Self {
        let alpha = ((1.0 - (-1.0 / (TAU * sample_rate as f32)).exp()) * 32767.0 + 0.5) as Q15;
        Self { env: 0, alpha }
    }

    /// Shape one sample
    ///
    /// `pot` is the shaping knob value; at `POT_MIN` the output equals
    /// the input (the envelope still advances).
    #[inline]
    pub fn process(&mut self, pot: i32, x: Q15) -> Q15 {
        let amount = map(pot, POT_MIN, POT_MAX, 0, Q15_MAX as i32) as Q15;
        let delta = q15_mul(self.alpha, q15_sub(x, self.env));
        self.env = q15_add(self.env, delta);
        let transient = q15_sub(x, self.env);
        q15_add(x, q15_mul(amount, transient))
    }

    /// Clear the envelope
    pub fn reset(&mut self) {
        self.env = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SAMPLE_RATE;

    // integer truncation stalls the envelope within ~32768/alpha counts
    // of the input; that bounds the residual "transient" on a DC signal
    const SETTLE_TOLERANCE: i16 = 96;

    fn shaper() -> TransientShaper {
        TransientShaper::new(SAMPLE_RATE)
    }

    #[test]
    fn test_alpha_precomputed_in_range() {
        let s = shaper();
        assert!(s.alpha > 0 && s.alpha < Q15_MAX / 8, "alpha = {}", s.alpha);
    }

    #[test]
    fn test_identity_at_minimum_knob() {
        let mut s = shaper();
        for x in [-20000, -1, 0, 1, 12345, Q15_MAX] {
            assert_eq!(s.process(POT_MIN, x), x);
        }
    }

    #[test]
    fn test_zero_input_exact_identity_any_knob() {
        for pot in [POT_MIN, POT_MAX / 2, POT_MAX] {
            let mut s = shaper();
            for _ in 0..256 {
                assert_eq!(s.process(pot, 0), 0);
            }
        }
    }

    #[test]
    fn test_steady_state_converges() {
        for pot in [POT_MAX / 3, POT_MAX] {
            let mut s = shaper();
            let x = 10_000;
            let mut out = 0;
            // long enough for the 1.5ms envelope to converge
            for _ in 0..4096 {
                out = s.process(pot, x);
            }
            assert!((out - x).abs() <= SETTLE_TOLERANCE, "pot={} out={}", pot, out);
        }
    }

    #[test]
    fn test_reset_clears_envelope() {
        let mut s = shaper();
        for _ in 0..4096 {
            s.process(POT_MAX, 10_000);
        }
        let settled = s.process(POT_MAX, 10_000);
        assert!((settled - 10_000).abs() <= SETTLE_TOLERANCE);

        // after a reset the same DC input reads as a fresh transient
        s.reset();
        let out = s.process(POT_MAX, 10_000);
        assert!(out > settled + SETTLE_TOLERANCE, "envelope not cleared: {}", out);
    }

    #[test]
    fn test_step_is_boosted() {
        let mut s = shaper();
        // settle on silence, then hit a step with the knob wide open
        for _ in 0..1024 {
            s.process(POT_MAX, 0);
        }
        let out = s.process(POT_MAX, 10_000);
        assert!(out > 10_000, "step not boosted: {}", out);
    }
}
