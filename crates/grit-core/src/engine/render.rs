//! Render core
//!
//! Per-block orchestrator: steps pot smoothing, edge-detects the
//! trigger, advances playback sample by sample, publishes each slot to
//! the effect core, and blocks on the completion barrier before handing
//! the finished block back to the audio callback.

use std::sync::Arc;

use crate::control::{PotBank, PotId};
use crate::hal::{Board, Layer, Led, LED_ACTIVE, LED_OFF};
use crate::qmath::map;
use crate::types::{Frame, POT_HALF, POT_MAX, POT_MIN, Q15};

use super::block::SharedBlock;
use super::message::{Message, RenderPort};
use super::params::SharedParams;
use super::player::SamplePlayer;

/// The render half of the dual-core pipeline
pub struct RenderCore {
    board: Arc<dyn Board>,
    pots: Arc<PotBank>,
    params: Arc<SharedParams>,
    block: Arc<SharedBlock>,
    port: RenderPort,
    player: SamplePlayer,
    /// Which indicator LED the next retrigger flash lands on
    active_led: Led,
    prev_trigger: bool,
}

impl RenderCore {
    pub(crate) fn new(
        board: Arc<dyn Board>,
        pots: Arc<PotBank>,
        params: Arc<SharedParams>,
        block: Arc<SharedBlock>,
        port: RenderPort,
        player: SamplePlayer,
    ) -> Self {
        Self {
            board,
            pots,
            params,
            block,
            port,
            player,
            active_led: Led::Led1,
            prev_trigger: false,
        }
    }

    /// Render one audio block into `output` (interleaved stereo)
    ///
    /// Blocks at the completion barrier until the effect core has
    /// processed every slot, then copies the finished block out.
    pub fn process_block(&mut self, output: &mut [Q15]) {
        let size = (output.len() / 2).min(self.block.capacity());
        self.block.set_len(size);

        self.pots.smooth_all();

        // logical trigger: external line, or shift held outside the
        // mode-select layer
        let trigger = self.board.trigger_in()
            || (self.board.shift_held() && self.board.layer() != Layer::Mode);
        if trigger && !self.prev_trigger {
            self.player.play();
            self.flash_retrigger();
        }
        self.prev_trigger = trigger;

        self.port.send(Message::Begin);

        let autoplay = self.params.autoplay();
        for index in 0..size {
            // gated: no advance, no write, but the slot is still handed
            // over — the effect core processes every index of every block
            if !autoplay && !self.board.trigger_in() {
                self.port.send(Message::SampleRequest(index));
                continue;
            }

            self.player.set_speed(self.params.pitch());

            if self.pots.get(PotId::Scrub).take_moved() {
                self.player.reset();
                self.flash_retrigger();
                self.apply_scrub();
            }

            if self.pots.get(PotId::Length).take_moved() {
                self.player
                    .set_reverse(self.pots.get(PotId::Length).value() < POT_HALF);
                self.apply_length();
                self.apply_scrub();
            }

            if self.player.is_playing() {
                self.player.process();
                self.block
                    .store(index, Frame::new(self.player.left(), self.player.right()));
                self.board.set_led(self.active_led, LED_ACTIVE);
            } else {
                // end of region: immediately restart (self-looping)
                self.player.play();
                self.flash_retrigger();
            }

            self.port.send(Message::SampleRequest(index));
        }

        self.port.wait_done();

        for (i, frame) in output.chunks_exact_mut(2).enumerate().take(size) {
            let out = self.block.load(i);
            frame[0] = out.left;
            frame[1] = out.right;
        }
    }

    /// Map the scrub parameter onto `[0, region_len - 1]` and apply it
    fn apply_scrub(&mut self) {
        let last = self.player.region_len().saturating_sub(1);
        let start = map(self.params.scrub(), POT_MIN, POT_MAX, 0, last as i32);
        self.player.set_start(start.max(0) as usize);
    }

    /// Recompute the region length from the length parameter
    ///
    /// Distance from half-scale maps onto `[0, sample_len]`; exactly
    /// half-scale yields a zero-length region (silent until the knob
    /// moves off center). The new length is published for the effect
    /// core's density ratio.
    fn apply_length(&mut self) {
        let offset = (self.params.length() - POT_HALF).abs();
        let length = map(offset, 0, POT_HALF, 0, self.player.sample_len() as i32);
        self.player.set_length(length.max(0) as usize);
        self.params.set_region_len(self.player.region_len());
    }

    /// Blank the active LED and alternate to the other one
    fn flash_retrigger(&mut self) {
        self.board.set_led(self.active_led, LED_OFF);
        self.active_led = self.active_led.other();
    }

    /// Position the playhead will restart from (for diagnostics/tests)
    pub fn region_start(&self) -> usize {
        self.player.start()
    }
}
