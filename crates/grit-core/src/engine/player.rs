//! Sample playback primitive
//!
//! Owns the raw sample memory reference and the read position: start
//! offset, region length, reverse flag and fractional-speed advance with
//! linear interpolation. When the playhead leaves the configured region
//! the player stops itself; the render core decides what happens next
//! (it restarts immediately, producing the instrument's unconditional
//! self-looping).

use std::sync::Arc;

use crate::types::{Frame, Q15};

/// Variable-speed looping sample player
pub struct SamplePlayer {
    frames: Arc<[Frame]>,
    /// Fractional playhead, always within `[0, frames.len())`
    position: f64,
    /// Configured region start in samples
    start: usize,
    /// Configured region length in samples
    length: usize,
    reverse: bool,
    speed: f32,
    playing: bool,
    out: Frame,
}

impl SamplePlayer {
    /// Create a player over the full sample, stopped
    pub fn new(frames: Arc<[Frame]>) -> Self {
        let length = frames.len();
        Self {
            frames,
            position: 0.0,
            start: 0,
            length,
            reverse: false,
            speed: 1.0,
            playing: false,
            out: Frame::silence(),
        }
    }

    /// Full sample length in frames
    #[inline]
    pub fn sample_len(&self) -> usize {
        self.frames.len()
    }

    /// Configured region length in frames
    #[inline]
    pub fn region_len(&self) -> usize {
        self.length
    }

    /// Configured region start in frames
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Region entry point: first frame for the current direction
    fn entry_point(&self) -> f64 {
        let pos = if self.reverse {
            self.start + self.length.saturating_sub(1)
        } else {
            self.start
        };
        pos.min(self.sample_len().saturating_sub(1)) as f64
    }

    /// Start (or restart) playback from the configured start
    pub fn play(&mut self) {
        self.position = self.entry_point();
        self.playing = true;
    }

    /// Move the playhead back to the configured start, keeping the
    /// playing flag as-is
    pub fn reset(&mut self) {
        self.position = self.entry_point();
    }

    /// Set the region start offset (clamped into the sample)
    pub fn set_start(&mut self, start: usize) {
        self.start = start.min(self.sample_len().saturating_sub(1));
    }

    /// Set the region length (clamped to the sample length)
    ///
    /// A zero length is legal: the player reports not-playing on the
    /// next `process` call and outputs silence.
    pub fn set_length(&mut self, length: usize) {
        self.length = length.min(self.sample_len());
    }

    /// Set playback direction
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Set the playback speed multiplier (pitch)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Advance one output sample and latch the interpolated frame
    pub fn process(&mut self) {
        if !self.playing || self.length == 0 || self.frames.is_empty() {
            self.playing = false;
            self.out = Frame::silence();
            return;
        }

        self.out = self.interpolate(self.position);

        let step = self.speed as f64;
        if self.reverse {
            self.position -= step;
            if self.position < self.start as f64 {
                self.playing = false;
                self.position = self.entry_point();
            }
        } else {
            self.position += step;
            let end = (self.start + self.length).min(self.sample_len()) as f64;
            if self.position >= end {
                self.playing = false;
                self.position = self.entry_point();
            }
        }
    }

    /// Left channel of the last processed frame
    #[inline]
    pub fn left(&self) -> Q15 {
        self.out.left
    }

    /// Right channel of the last processed frame
    #[inline]
    pub fn right(&self) -> Q15 {
        self.out.right
    }

    fn interpolate(&self, position: f64) -> Frame {
        let i0 = position as usize;
        let i1 = (i0 + 1).min(self.sample_len() - 1);
        let frac = position - i0 as f64;
        let a = self.frames[i0];
        let b = self.frames[i1];
        Frame::new(
            (a.left as f64 + (b.left as f64 - a.left as f64) * frac) as Q15,
            (a.right as f64 + (b.right as f64 - a.right as f64) * frac) as Q15,
        )
    }
}
