//! Common types for Grit
//!
//! This module contains the fundamental audio types used throughout the
//! Grit engine: the Q15 fixed-point sample format, the packed stereo
//! frame, and the pot/block constants shared by every component.

/// Sample rate of the instrument (fixed by the codec clock)
pub const SAMPLE_RATE: u32 = 48_000;

/// Audio sample type: Q15 fixed-point (signed 16-bit, implicit /32768 scale)
pub type Q15 = i16;

/// Maximum representable Q15 value
pub const Q15_MAX: Q15 = i16::MAX;

/// Minimum representable Q15 value
pub const Q15_MIN: Q15 = i16::MIN;

/// Minimum pot/CV reading (12-bit ADC)
pub const POT_MIN: i32 = 0;

/// Maximum pot/CV reading (12-bit ADC)
pub const POT_MAX: i32 = 4095;

/// Half-scale pot reading (center detent for bipolar controls)
pub const POT_HALF: i32 = POT_MAX / 2;

/// Maximum audio block size the engine pre-allocates for
///
/// The hardware picks the actual block size at stream start; it is
/// constant per callback and must not exceed this.
pub const MAX_BLOCK_SIZE: usize = 1024;

/// A single stereo frame of Q15 samples
///
/// Packs into one `u32` so a frame can be stored in a single atomic slot
/// of the shared output block, keeping the cross-core handoff tear-free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: Q15,
    pub right: Q15,
}

impl Frame {
    /// Create a new stereo frame
    #[inline]
    pub fn new(left: Q15, right: Q15) -> Self {
        Self { left, right }
    }

    /// Create a silent frame
    #[inline]
    pub fn silence() -> Self {
        Self::default()
    }

    /// Create a mono frame (same value in both channels)
    #[inline]
    pub fn mono(value: Q15) -> Self {
        Self { left: value, right: value }
    }

    /// Pack into a single word: left in the high half, right in the low half
    #[inline]
    pub fn pack(self) -> u32 {
        ((self.left as u16 as u32) << 16) | (self.right as u16 as u32)
    }

    /// Unpack from a word produced by [`Frame::pack`]
    #[inline]
    pub fn unpack(bits: u32) -> Self {
        Self {
            left: (bits >> 16) as u16 as i16,
            right: bits as u16 as i16,
        }
    }
}
