//! In-memory control surface for tests and offline rendering
//!
//! Every input is an atomic, so a test (or the offline renderer's
//! gesture script) can move knobs from one thread while the engine reads
//! them from another, with the same torn-read tolerance as real ADC
//! values.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

use crate::types::{POT_HALF, POT_MAX, POT_MIN};

use super::{Board, CvInput, Layer, Led, PotChannel, LED_OFF, NUM_CV_INPUTS, NUM_POT_CHANNELS};

/// A virtual control surface
pub struct VirtualBoard {
    trigger: AtomicBool,
    shift: AtomicBool,
    layer: AtomicU8,
    pots: [AtomicI32; NUM_POT_CHANNELS],
    cvs: [AtomicI32; NUM_CV_INPUTS],
    leds: [AtomicU32; 2],
}

impl VirtualBoard {
    /// Create a board with everything at rest: trigger low, normal
    /// layer, pots at minimum, CVs at their neutral center value.
    pub fn new() -> Self {
        Self {
            trigger: AtomicBool::new(false),
            shift: AtomicBool::new(false),
            layer: AtomicU8::new(0),
            pots: std::array::from_fn(|_| AtomicI32::new(POT_MIN)),
            cvs: std::array::from_fn(|_| AtomicI32::new(POT_HALF)),
            leds: std::array::from_fn(|_| AtomicU32::new(LED_OFF)),
        }
    }

    /// Set the external trigger level
    pub fn set_trigger(&self, high: bool) {
        self.trigger.store(high, Ordering::Relaxed);
    }

    /// Press or release the shift button
    pub fn set_shift(&self, held: bool) {
        self.shift.store(held, Ordering::Relaxed);
    }

    /// Switch the active control layer
    pub fn set_layer(&self, layer: Layer) {
        let value = match layer {
            Layer::Normal => 0,
            Layer::Shift => 1,
            Layer::Settings => 2,
            Layer::Mode => 3,
        };
        self.layer.store(value, Ordering::Relaxed);
    }

    /// Turn a pot to a raw ADC value (clamped to the pot range)
    pub fn set_pot(&self, channel: PotChannel, value: i32) {
        self.pots[channel as usize].store(value.clamp(POT_MIN, POT_MAX), Ordering::Relaxed);
    }

    /// Apply a voltage to a CV jack (clamped to the ADC range)
    pub fn set_cv(&self, input: CvInput, value: i32) {
        self.cvs[input as usize].store(value.clamp(POT_MIN, POT_MAX), Ordering::Relaxed);
    }

    /// Last color written to an LED
    pub fn led(&self, led: Led) -> u32 {
        self.leds[led as usize].load(Ordering::Relaxed)
    }
}

impl Default for VirtualBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for VirtualBoard {
    fn trigger_in(&self) -> bool {
        self.trigger.load(Ordering::Relaxed)
    }

    fn shift_held(&self) -> bool {
        self.shift.load(Ordering::Relaxed)
    }

    fn layer(&self) -> Layer {
        match self.layer.load(Ordering::Relaxed) {
            1 => Layer::Shift,
            2 => Layer::Settings,
            3 => Layer::Mode,
            _ => Layer::Normal,
        }
    }

    fn pot_raw(&self, channel: PotChannel) -> i32 {
        self.pots[channel as usize].load(Ordering::Relaxed)
    }

    fn cv(&self, input: CvInput) -> i32 {
        self.cvs[input as usize].load(Ordering::Relaxed)
    }

    fn set_led(&self, led: Led, color: u32) {
        self.leds[led as usize].store(color, Ordering::Relaxed);
    }
}
