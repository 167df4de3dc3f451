//! Fixed-point stereo delay line
//!
//! The bare delay primitive used by the density network: a single
//! settable tap, no feedback, fully wet output. Buffers are allocated
//! once at construction; everything after that is allocation-free.

use crate::types::Q15;

/// A stereo delay line with one movable tap
pub struct StereoDelayLine {
    buffer_l: Vec<Q15>,
    buffer_r: Vec<Q15>,
    write_pos: usize,
    delay: usize,
    max_delay: usize,
}

impl StereoDelayLine {
    /// Create a delay line holding up to `max_delay` samples
    pub fn new(max_delay: usize) -> Self {
        // one extra slot so a tap of exactly max_delay is addressable
        let capacity = max_delay + 1;
        Self {
            buffer_l: vec![0; capacity],
            buffer_r: vec![0; capacity],
            write_pos: 0,
            delay: 0,
            max_delay,
        }
    }

    /// Maximum tap length in samples
    #[inline]
    pub fn max_delay(&self) -> usize {
        self.max_delay
    }

    /// Set the tap length in samples (clamped to the allocated span)
    #[inline]
    pub fn set_delay(&mut self, samples: usize) {
        self.delay = samples.min(self.max_delay);
    }

    /// Current tap length in samples
    #[inline]
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Push one input frame and read the tap
    ///
    /// Reads the sample written `delay` frames ago, then records the
    /// input. A tap of zero therefore returns the previous cycle's
    /// content at the write position, never the sample being written.
    #[inline]
    pub fn process(&mut self, left: Q15, right: Q15) -> (Q15, Q15) {
        let len = self.buffer_l.len();
        let read_pos = if self.write_pos >= self.delay {
            self.write_pos - self.delay
        } else {
            len - (self.delay - self.write_pos)
        };
        let out = (self.buffer_l[read_pos], self.buffer_r[read_pos]);

        self.buffer_l[self.write_pos] = left;
        self.buffer_r[self.write_pos] = right;
        self.write_pos = (self.write_pos + 1) % len;

        out
    }

    /// Clear the buffers
    pub fn reset(&mut self) {
        self.buffer_l.fill(0);
        self.buffer_r.fill(0);
        self.write_pos = 0;
    }
}
