//! Density effect
//!
//! Two feedback-free delay lines summed additively onto the signal. The
//! tap length of each line is recomputed every sample from the density
//! knob and the ratio of the active playback region to the full sample,
//! so shorter scrub regions produce shorter, denser echoes. The two
//! channels have deliberately unequal maximum spans to keep their comb
//! responses decorrelated.

use crate::qmath::{map, q15_add};
use crate::types::{Frame, POT_MAX, POT_MIN};

use super::StereoDelayLine;

/// Maximum delay span per network channel, in samples
///
/// Unequal on purpose; equal spans would comb-filter in lockstep.
pub const DENSITY_SPANS: [usize; 2] = [4057, 12368];

/// Knob readings at or below this leave the signal untouched
pub const DENSITY_DEADZONE: i32 = POT_MIN + 10;

/// The dual delay-line density network
pub struct Density {
    lines: [StereoDelayLine; 2],
}

impl Density {
    /// Create the network with both lines at their full span
    pub fn new() -> Self {
        Self {
            lines: [
                StereoDelayLine::new(DENSITY_SPANS[0]),
                StereoDelayLine::new(DENSITY_SPANS[1]),
            ],
        }
    }

    /// Process one frame
    ///
    /// `pot` is the density knob value, `region_len` the active playback
    /// region length and `sample_len` the full sample length (both in
    /// samples). Below the deadzone the input frame is returned
    /// bit-identical and the delay lines are not advanced.
    pub fn process(&mut self, pot: i32, region_len: usize, sample_len: usize, frame: Frame) -> Frame {
        if pot <= DENSITY_DEADZONE {
            return frame;
        }

        let dry = frame;
        let mut out = frame;
        for (j, line) in self.lines.iter_mut().enumerate() {
            let span = Self::tap_length(pot, region_len, sample_len, j);
            line.set_delay(span);
            let (wet_l, wet_r) = line.process(dry.left, dry.right);
            out.left = q15_add(out.left, wet_l);
            out.right = q15_add(out.right, wet_r);
        }
        out
    }

    /// Tap length for network channel `j` at the given knob and region
    pub fn tap_length(pot: i32, region_len: usize, sample_len: usize, j: usize) -> usize {
        let span_max = map(
            region_len as i32,
            0,
            sample_len as i32,
            0,
            DENSITY_SPANS[j] as i32,
        );
        map(pot, POT_MIN, POT_MAX, 0, span_max).max(0) as usize
    }

    /// Clear both delay lines
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.reset();
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Q15_MAX, POT_HALF};

    const SAMPLE_LEN: usize = 100_000;

    #[test]
    fn test_bypass_below_deadzone() {
        let mut density = Density::new();
        let frame = Frame::new(1234, -4321);
        for pot in [POT_MIN, DENSITY_DEADZONE - 1, DENSITY_DEADZONE] {
            assert_eq!(density.process(pot, SAMPLE_LEN, SAMPLE_LEN, frame), frame);
        }
    }

    #[test]
    fn test_active_just_above_deadzone() {
        let mut density = Density::new();
        // the delay lines start silent, so the first active frame passes
        // the dry signal plus two zero taps
        let frame = Frame::new(1000, 1000);
        let out = density.process(DENSITY_DEADZONE + 1, SAMPLE_LEN, SAMPLE_LEN, frame);
        assert_eq!(out, frame);
    }

    #[test]
    fn test_channel_spans_never_equal() {
        for pot in [DENSITY_DEADZONE + 1, POT_HALF, POT_MAX] {
            for region in [SAMPLE_LEN / 10, SAMPLE_LEN / 2, SAMPLE_LEN] {
                let a = Density::tap_length(pot, region, SAMPLE_LEN, 0);
                let b = Density::tap_length(pot, region, SAMPLE_LEN, 1);
                assert_ne!(a, b, "pot={} region={}", pot, region);
            }
        }
    }

    #[test]
    fn test_shorter_region_shortens_taps() {
        let long = Density::tap_length(POT_MAX, SAMPLE_LEN, SAMPLE_LEN, 0);
        let short = Density::tap_length(POT_MAX, SAMPLE_LEN / 4, SAMPLE_LEN, 0);
        assert_eq!(long, DENSITY_SPANS[0]);
        assert!(short < long);
    }

    #[test]
    fn test_saturating_mix_never_wraps() {
        let mut density = Density::new();
        let loud = Frame::new(Q15_MAX - 10, Q15_MAX - 10);
        // prime the lines with hot signal, then keep feeding it; the
        // additive mix must clamp at Q15_MAX instead of wrapping negative
        for _ in 0..DENSITY_SPANS[1] + 16 {
            let out = density.process(POT_MAX, SAMPLE_LEN, SAMPLE_LEN, loud);
            assert!(out.left >= loud.left, "wrapped: {}", out.left);
            assert!(out.right >= loud.right);
        }
    }

    #[test]
    fn test_reset_drops_pending_echoes() {
        let mut density = Density::new();
        density.process(POT_MAX, SAMPLE_LEN, SAMPLE_LEN, Frame::mono(8000));
        density.reset();
        for _ in 0..DENSITY_SPANS[1] + 1 {
            let out = density.process(POT_MAX, SAMPLE_LEN, SAMPLE_LEN, Frame::silence());
            assert_eq!(out, Frame::silence());
        }
    }

    #[test]
    fn test_echo_of_impulse() {
        let mut density = Density::new();
        let pot = POT_MAX;
        let tap0 = Density::tap_length(pot, SAMPLE_LEN, SAMPLE_LEN, 0);

        let mut outputs = Vec::new();
        outputs.push(density.process(pot, SAMPLE_LEN, SAMPLE_LEN, Frame::mono(8000)));
        for _ in 0..DENSITY_SPANS[1] + 1 {
            outputs.push(density.process(pot, SAMPLE_LEN, SAMPLE_LEN, Frame::silence()));
        }

        assert_eq!(outputs[tap0].left, 8000, "first echo at tap length");
        assert_eq!(outputs[DENSITY_SPANS[1]].left, 8000, "second echo at tap length");
    }
}
