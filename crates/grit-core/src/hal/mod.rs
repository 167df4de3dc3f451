//! Hardware abstraction for the instrument's control surface
//!
//! The [`Board`] trait is the boundary between the engine and the
//! physical hardware (ADC, GPIO, LEDs). The engine only ever sees knob
//! and CV readings, digital levels, and LED writes; the driver layer
//! behind this trait is someone else's problem.
//!
//! [`VirtualBoard`] is a fully in-memory implementation used by tests
//! and the offline renderer.

mod virtual_board;

pub use virtual_board::VirtualBoard;

/// Number of physical pot channels on the panel
pub const NUM_POT_CHANNELS: usize = 6;

/// Number of CV jacks routed to engine parameters
pub const NUM_CV_INPUTS: usize = 3;

/// LED color for active playback
pub const LED_ACTIVE: u32 = 0x00FF00;

/// LED color for idle / just-retriggered
pub const LED_OFF: u32 = 0x000000;

/// Control layers the panel multiplexes the six pots across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Default layer: the printed panel legend
    Normal,
    /// Shift button held: modulation depths
    Shift,
    /// Settings layer: global toggles
    Settings,
    /// Mode-select layer: app switching, owned by the system firmware
    Mode,
}

/// Physical pot channels, left to right on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum PotChannel {
    Pot1 = 0,
    Pot2 = 1,
    Pot3 = 2,
    Pot4 = 3,
    Pot5 = 4,
    Pot6 = 5,
}

/// CV jacks feeding engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum CvInput {
    /// Modulates the scrub (start offset) parameter
    Scrub = 0,
    /// Modulates the playback region length
    Length = 1,
    /// Modulates pitch (volt-per-octave style jack)
    Note = 2,
}

/// The two indicator LEDs, driven alternately on retrigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Led {
    Led1 = 0,
    Led2 = 1,
}

impl Led {
    /// The other indicator LED
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Led::Led1 => Led::Led2,
            Led::Led2 => Led::Led1,
        }
    }
}

/// Control-surface access as seen by the engine
///
/// All reads must be non-blocking and cheap enough for per-block (and in
/// the trigger's case, per-sample-adjacent) use. Implementations are
/// shared across the render core, the effect core and the UI loop, so
/// they must be `Send + Sync`; torn reads of analog values are tolerated
/// by the engine.
pub trait Board: Send + Sync {
    /// Current level of the external trigger input
    fn trigger_in(&self) -> bool;

    /// Raw (undebounced) state of the shift button
    fn shift_held(&self) -> bool;

    /// Currently active control layer
    fn layer(&self) -> Layer;

    /// Latest ADC reading for a pot channel, in `[POT_MIN, POT_MAX]`
    fn pot_raw(&self, channel: PotChannel) -> i32;

    /// Latest ADC reading for a CV jack, in `[POT_MIN, POT_MAX]`
    fn cv(&self, input: CvInput) -> i32;

    /// Drive an indicator LED with a packed 0xRRGGBB color
    fn set_led(&self, led: Led, color: u32);
}
