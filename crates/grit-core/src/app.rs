//! Application assembly
//!
//! [`GritApp`] wires the engine together and implements [`Instrument`],
//! the capability contract the real-time scheduler drives: init/deinit,
//! the per-block audio callback, the UI tick, and the (stub) MIDI
//! handler. Construction hands back the [`EffectCore`] so the caller
//! can give it to the second core / a worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::control::{PotBank, Quantizer};
use crate::effect::TransientShaper;
use crate::engine::{
    message_channel, EffectCore, RenderCore, SamplePlayer, SharedBlock, SharedParams, UiControls,
};
use crate::error::{EngineError, EngineResult};
use crate::hal::Board;
use crate::types::{Frame, MAX_BLOCK_SIZE, Q15};

/// A parsed MIDI message (reserved extension point)
#[derive(Debug, Clone, Copy)]
pub struct MidiMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

/// Callback contract between the engine and the real-time scheduler
pub trait Instrument {
    /// Prepare for processing; until this runs, every callback is a no-op
    fn init(&mut self);

    /// Clear the initialized flag; the effect core winds down on its own
    fn deinit(&mut self);

    /// Render one audio block (interleaved stereo in and out, equal size)
    ///
    /// Must complete before the next block is due.
    fn process_block(&mut self, input: &[Q15], output: &mut [Q15]);

    /// Called whenever the render core isn't busy; no fixed period
    fn ui_tick(&mut self);

    /// Handle an incoming MIDI message
    fn midi(&mut self, msg: MidiMessage);
}

/// The assembled sample-scrubbing instrument
pub struct GritApp {
    render: RenderCore,
    ui: UiControls,
    initialized: Arc<AtomicBool>,
}

impl GritApp {
    /// Build the engine over a loaded sample
    ///
    /// Returns the app (render + UI halves) and the [`EffectCore`]. Spawn
    /// the effect core on its own thread *after* calling
    /// [`Instrument::init`] — its run loop exits whenever the
    /// initialized flag is clear.
    pub fn new(
        config: &EngineConfig,
        frames: Arc<[Frame]>,
        board: Arc<dyn Board>,
    ) -> EngineResult<(Self, EffectCore)> {
        config.validate()?;
        if frames.is_empty() {
            return Err(EngineError::EmptySample);
        }

        let sample_len = frames.len();
        let pots = Arc::new(PotBank::new());
        let params = Arc::new(SharedParams::new(config.autoplay, sample_len));
        let block = Arc::new(SharedBlock::new(MAX_BLOCK_SIZE));
        let initialized = Arc::new(AtomicBool::new(false));
        let (render_port, worker_port) = message_channel();

        let player = SamplePlayer::new(frames);
        let render = RenderCore::new(
            Arc::clone(&board),
            Arc::clone(&pots),
            Arc::clone(&params),
            Arc::clone(&block),
            render_port,
            player,
        );

        let effect_core = EffectCore::new(
            worker_port,
            block,
            Arc::clone(&pots),
            Arc::clone(&params),
            TransientShaper::new(config.sample_rate),
            sample_len,
            Arc::clone(&initialized),
        );

        let ui = UiControls::new(board, pots, params, Quantizer::new(config.scale));

        log::info!(
            "engine assembled: {} frames, block size {}, {} Hz",
            sample_len,
            config.block_size,
            config.sample_rate
        );

        Ok((
            Self {
                render,
                ui,
                initialized,
            },
            effect_core,
        ))
    }

    /// Whether the engine is initialized
    #[inline]
    pub fn initialized(&self) -> bool {
        self.initialized.load(Ordering::Relaxed)
    }
}

impl Instrument for GritApp {
    fn init(&mut self) {
        self.initialized.store(true, Ordering::Relaxed);
        log::info!("engine initialized");
    }

    fn deinit(&mut self) {
        self.initialized.store(false, Ordering::Relaxed);
        log::info!("engine deinitialized");
    }

    fn process_block(&mut self, _input: &[Q15], output: &mut [Q15]) {
        // strict no-op before init: the output buffer is left untouched
        if !self.initialized() {
            return;
        }
        self.render.process_block(output);
    }

    fn ui_tick(&mut self) {
        if !self.initialized() {
            return;
        }
        self.ui.tick();
    }

    fn midi(&mut self, _msg: MidiMessage) {
        // reserved extension point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::VirtualBoard;

    fn test_sample(len: usize) -> Arc<[Frame]> {
        (0..len).map(|i| Frame::mono((i % 100) as i16)).collect()
    }

    #[test]
    fn test_empty_sample_rejected() {
        let board = Arc::new(VirtualBoard::new());
        let result = GritApp::new(&EngineConfig::default(), Arc::from(vec![]), board);
        assert!(matches!(result, Err(EngineError::EmptySample)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let board = Arc::new(VirtualBoard::new());
        let config = EngineConfig {
            block_size: MAX_BLOCK_SIZE * 2,
            ..Default::default()
        };
        let result = GritApp::new(&config, test_sample(1000), board);
        assert!(matches!(result, Err(EngineError::BlockTooLarge(_))));
    }

    #[test]
    fn test_uninitialized_callback_is_noop() {
        let board = Arc::new(VirtualBoard::new());
        let (mut app, _effect) =
            GritApp::new(&EngineConfig::default(), test_sample(1000), board).unwrap();

        let input = vec![0; 128];
        let mut output = vec![1234; 128];
        app.process_block(&input, &mut output);
        // untouched, not zeroed
        assert!(output.iter().all(|&s| s == 1234));
    }

    #[test]
    fn test_init_deinit_flag() {
        let board = Arc::new(VirtualBoard::new());
        let (mut app, _effect) =
            GritApp::new(&EngineConfig::default(), test_sample(1000), board).unwrap();
        assert!(!app.initialized());
        app.init();
        assert!(app.initialized());
        app.deinit();
        assert!(!app.initialized());
    }
}
