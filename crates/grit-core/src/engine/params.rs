//! Shared parameter state
//!
//! The UI-rate loop computes scrub/length/pitch/autoplay and publishes
//! them here; the render core reads them every sample. The render core
//! in turn publishes the active playback-region length for the effect
//! core's density ratio. Plain atomics with `Ordering::Relaxed`
//! throughout: these are slow-varying analog quantities, and a stale
//! read self-corrects on the next cycle.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicUsize, Ordering};

use crate::types::{POT_HALF, POT_MIN};

/// Parameters shared between the UI loop and the audio cores
pub struct SharedParams {
    /// Scrub knob plus attenuverted CV, in pot range
    scrub: AtomicI32,
    /// Length knob plus attenuverted CV, in pot range
    length: AtomicI32,
    /// Quantized playback-speed multiplier (f32 bits)
    pitch_bits: AtomicU32,
    /// Free-running playback without external trigger
    autoplay: AtomicBool,
    /// Active playback region length in samples (render core publishes)
    region_len: AtomicUsize,
}

impl SharedParams {
    /// Create with neutral values and the given autoplay default
    pub fn new(autoplay: bool, region_len: usize) -> Self {
        Self {
            scrub: AtomicI32::new(POT_MIN),
            length: AtomicI32::new(POT_HALF),
            pitch_bits: AtomicU32::new(1.0f32.to_bits()),
            autoplay: AtomicBool::new(autoplay),
            region_len: AtomicUsize::new(region_len),
        }
    }

    #[inline]
    pub fn scrub(&self) -> i32 {
        self.scrub.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_scrub(&self, value: i32) {
        self.scrub.store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn length(&self) -> i32 {
        self.length.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_length(&self, value: i32) {
        self.length.store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        f32::from_bits(self.pitch_bits.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_pitch(&self, multiplier: f32) {
        self.pitch_bits.store(multiplier.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn autoplay(&self) -> bool {
        self.autoplay.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_autoplay(&self, enabled: bool) {
        self.autoplay.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn region_len(&self) -> usize {
        self.region_len.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_region_len(&self, samples: usize) {
        self.region_len.store(samples, Ordering::Relaxed);
    }
}
