//! Layered, smoothed pot readers
//!
//! The six physical pots are multiplexed across control layers, giving
//! ten logical parameters. Each [`Pot`] latches its raw ADC value at UI
//! rate (only while its layer is active) and runs a cheap one-pole
//! smoothing step at audio rate.
//!
//! All state lives in atomics with `Ordering::Relaxed`: the render core
//! steps the smoothing and consumes movement edges, the effect core
//! reads values, and the UI loop latches raw readings, all without
//! locks. A torn read is at worst a one-sample glitch on a slow-moving
//! analog value.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::hal::{Board, Layer, PotChannel};
use crate::types::{POT_HALF, POT_MAX, POT_MIN};

/// Right-shift amount for the one-pole smoothing step
const SMOOTH_SHIFT: i32 = 3;

/// Smoothed-value delta that counts as deliberate user movement
const MOVE_THRESHOLD: i32 = 12;

/// Half-width of the center deadzone (for pots with a center detent)
const CENTER_DEADZONE: i32 = 60;

/// Logical pot parameters across all layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum PotId {
    Harmony = 0,
    Scrub = 1,
    Density = 2,
    Pitch = 3,
    Fx = 4,
    Length = 5,
    ScrubMod = 6,
    PitchMod = 7,
    LengthMod = 8,
    Autoplay = 9,
}

impl PotId {
    /// All logical pots in index order
    pub const ALL: [PotId; 10] = [
        PotId::Harmony,
        PotId::Scrub,
        PotId::Density,
        PotId::Pitch,
        PotId::Fx,
        PotId::Length,
        PotId::ScrubMod,
        PotId::PitchMod,
        PotId::LengthMod,
        PotId::Autoplay,
    ];

    /// Number of logical pots
    pub const COUNT: usize = Self::ALL.len();

    /// Panel wiring: which physical channel and layer this pot lives on,
    /// its initial value, and whether it has a center deadzone.
    fn wiring(self) -> (PotChannel, Layer, i32, bool) {
        match self {
            PotId::Harmony => (PotChannel::Pot1, Layer::Normal, POT_MIN, false),
            PotId::Scrub => (PotChannel::Pot2, Layer::Normal, POT_MIN, false),
            PotId::Density => (PotChannel::Pot3, Layer::Normal, POT_MIN, false),
            PotId::Pitch => (PotChannel::Pot4, Layer::Normal, POT_HALF, true),
            PotId::Fx => (PotChannel::Pot5, Layer::Normal, POT_MIN, false),
            PotId::Length => (PotChannel::Pot6, Layer::Normal, POT_HALF, true),
            PotId::ScrubMod => (PotChannel::Pot2, Layer::Shift, POT_HALF, false),
            PotId::PitchMod => (PotChannel::Pot4, Layer::Shift, POT_HALF, false),
            PotId::LengthMod => (PotChannel::Pot6, Layer::Shift, POT_HALF, false),
            PotId::Autoplay => (PotChannel::Pot4, Layer::Settings, POT_MAX, false),
        }
    }
}

/// One logical pot parameter
pub struct Pot {
    channel: PotChannel,
    layer: Layer,
    deadzone: bool,
    /// Raw target latched at UI rate
    raw: AtomicI32,
    /// Smoothed value stepped at audio rate
    value: AtomicI32,
    /// Sticky movement edge, set by the smoother, consumed by the render core
    moved: AtomicBool,
    /// Value at the last movement edge
    moved_anchor: AtomicI32,
    /// Snapshot for change detection (settings-layer toggles)
    changed_anchor: AtomicI32,
}

impl Pot {
    fn new(id: PotId) -> Self {
        let (channel, layer, initial, deadzone) = id.wiring();
        Self {
            channel,
            layer,
            deadzone,
            raw: AtomicI32::new(initial),
            value: AtomicI32::new(initial),
            moved: AtomicBool::new(false),
            moved_anchor: AtomicI32::new(initial),
            changed_anchor: AtomicI32::new(initial),
        }
    }

    /// Latch the raw ADC reading (UI rate)
    ///
    /// Only latches while this pot's layer is active; on other layers the
    /// physical knob belongs to a different logical parameter.
    pub fn read_raw(&self, board: &dyn Board) {
        if board.layer() != self.layer {
            return;
        }
        let mut raw = board.pot_raw(self.channel).clamp(POT_MIN, POT_MAX);
        if self.deadzone && (raw - POT_HALF).abs() <= CENTER_DEADZONE {
            raw = POT_HALF;
        }
        self.raw.store(raw, Ordering::Relaxed);
    }

    /// One smoothing step toward the latched raw value (audio rate)
    pub fn smooth_step(&self) {
        let raw = self.raw.load(Ordering::Relaxed);
        let value = self.value.load(Ordering::Relaxed);
        let diff = raw - value;
        let next = if diff.abs() < (1 << SMOOTH_SHIFT) {
            raw
        } else {
            value + (diff >> SMOOTH_SHIFT)
        };
        self.value.store(next, Ordering::Relaxed);

        if (next - self.moved_anchor.load(Ordering::Relaxed)).abs() > MOVE_THRESHOLD {
            self.moved_anchor.store(next, Ordering::Relaxed);
            self.moved.store(true, Ordering::Relaxed);
        }
    }

    /// Current smoothed value in `[POT_MIN, POT_MAX]`
    #[inline]
    pub fn value(&self) -> i32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Consume the sticky movement edge
    ///
    /// Returns true once per deliberate knob movement, then re-arms.
    #[inline]
    pub fn take_moved(&self) -> bool {
        self.moved.swap(false, Ordering::Relaxed)
    }

    /// Consume a value-changed edge (any delta since the last call)
    pub fn take_changed(&self) -> bool {
        let value = self.value();
        self.changed_anchor.swap(value, Ordering::Relaxed) != value
    }
}

/// All logical pots of the instrument
pub struct PotBank {
    pots: [Pot; PotId::COUNT],
}

impl PotBank {
    /// Create the bank with every pot at its panel default
    pub fn new() -> Self {
        Self {
            pots: std::array::from_fn(|i| Pot::new(PotId::ALL[i])),
        }
    }

    /// Get a pot by id
    #[inline]
    pub fn get(&self, id: PotId) -> &Pot {
        &self.pots[id as usize]
    }

    /// Latch raw readings for every pot (UI rate)
    pub fn read_all(&self, board: &dyn Board) {
        for pot in &self.pots {
            pot.read_raw(board);
        }
    }

    /// Step smoothing for every pot (audio rate, once per block)
    pub fn smooth_all(&self) {
        for pot in &self.pots {
            pot.smooth_step();
        }
    }
}

impl Default for PotBank {
    fn default() -> Self {
        Self::new()
    }
}
