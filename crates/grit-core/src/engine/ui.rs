//! Parameter acquisition (UI rate)
//!
//! Runs between audio blocks at no guaranteed cadence: latches raw pot
//! readings, folds in attenuverted CV, shapes the pitch pot through the
//! nonlinear curve and the quantizer, and publishes everything to
//! [`SharedParams`]. On the settings layer, the dedicated knob's
//! half-scale crossing toggles autoplay (edge-triggered).

use std::sync::Arc;

use crate::control::{PotBank, PotId, Quantizer};
use crate::hal::{Board, CvInput, Layer};
use crate::qmath::CurveMap;
use crate::types::{POT_HALF, POT_MAX, POT_MIN};

use super::params::SharedParams;

/// Pitch pot response: a quarter speed at the bottom, unity at center,
/// four octaves up at the top
pub const PITCH_CURVE: CurveMap<3> = CurveMap {
    input: [POT_MIN, POT_HALF, POT_MAX],
    output: [0.25, 1.0, 4.0],
};

/// Scale and invert a CV reading by a mod knob
///
/// The mod knob is an attenuverter: center is off, full clockwise adds
/// the centered CV at +1x, full counter-clockwise at -1x.
pub fn attenuvert(cv: i32, mod_knob: i32) -> i32 {
    (cv - POT_HALF) * (mod_knob - POT_HALF) / POT_HALF
}

/// The UI-rate half of the engine
pub struct UiControls {
    board: Arc<dyn Board>,
    pots: Arc<PotBank>,
    params: Arc<SharedParams>,
    quantizer: Quantizer,
}

impl UiControls {
    pub(crate) fn new(
        board: Arc<dyn Board>,
        pots: Arc<PotBank>,
        params: Arc<SharedParams>,
        quantizer: Quantizer,
    ) -> Self {
        Self {
            board,
            pots,
            params,
            quantizer,
        }
    }

    /// One acquisition pass: read pots, publish parameters
    pub fn tick(&mut self) {
        self.pots.read_all(self.board.as_ref());

        let scrub = self.pots.get(PotId::Scrub).value()
            + attenuvert(
                self.board.cv(CvInput::Scrub),
                self.pots.get(PotId::ScrubMod).value(),
            );
        self.params.set_scrub(scrub.clamp(POT_MIN, POT_MAX));

        let length = self.pots.get(PotId::Length).value()
            + attenuvert(
                self.board.cv(CvInput::Length),
                self.pots.get(PotId::LengthMod).value(),
            );
        self.params.set_length(length.clamp(POT_MIN, POT_MAX));

        let pitch_pot = self.pots.get(PotId::Pitch).value()
            + attenuvert(
                self.board.cv(CvInput::Note),
                self.pots.get(PotId::PitchMod).value(),
            );
        let pitch = self
            .quantizer
            .process_multiplier(PITCH_CURVE.at(pitch_pot.clamp(POT_MIN, POT_MAX)));
        self.params.set_pitch(pitch);

        if self.board.layer() == Layer::Settings {
            let autoplay_pot = self.pots.get(PotId::Autoplay);
            if autoplay_pot.take_changed() {
                let enabled = autoplay_pot.value() > POT_HALF;
                log::info!("autoplay {}", if enabled { "on" } else { "off" });
                self.params.set_autoplay(enabled);
            }
        }
    }
}
