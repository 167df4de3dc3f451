//! Effect core
//!
//! The consumer half of the pipeline: polls the message channel, applies
//! Density then the Transient Shaper in place to each handed-over slot,
//! and signals completion once the whole block is processed. Runs for as
//! long as the engine stays initialized; the flag is sampled between
//! polls, so shutdown is best-effort rather than synchronous.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::control::{PotBank, PotId};
use crate::effect::{Density, TransientShaper};

use super::block::SharedBlock;
use super::message::{Message, WorkerPort};
use super::params::SharedParams;

/// The effect half of the dual-core pipeline
pub struct EffectCore {
    port: WorkerPort,
    block: Arc<SharedBlock>,
    pots: Arc<PotBank>,
    params: Arc<SharedParams>,
    density: Density,
    shaper: TransientShaper,
    sample_len: usize,
    running: Arc<AtomicBool>,
    processed: usize,
}

impl EffectCore {
    pub(crate) fn new(
        port: WorkerPort,
        block: Arc<SharedBlock>,
        pots: Arc<PotBank>,
        params: Arc<SharedParams>,
        shaper: TransientShaper,
        sample_len: usize,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            port,
            block,
            pots,
            params,
            density: Density::new(),
            shaper,
            sample_len,
            running,
            processed: 0,
        }
    }

    /// Run the worker loop until the engine is deinitialized
    ///
    /// Intended for a dedicated thread; parks briefly when the channel
    /// is idle so the shutdown flag keeps getting sampled.
    pub fn run(mut self) {
        log::info!("effect core started");
        while self.running.load(Ordering::Relaxed) {
            if !self.poll_once() {
                self.port.idle_wait();
            }
        }
        log::info!("effect core stopped");
    }

    /// Handle at most one pending message; returns false when idle
    pub fn poll_once(&mut self) -> bool {
        match self.port.try_receive() {
            Some(Message::Begin) => {
                self.processed = 0;
                true
            }
            Some(Message::SampleRequest(index)) => {
                self.process_slot(index);
                self.processed += 1;
                if self.processed == self.block.len() {
                    self.port.send_done();
                }
                true
            }
            // Done only ever travels the other way
            Some(Message::Done) => true,
            None => false,
        }
    }

    /// Apply Density then the Transient Shaper to one slot, in place
    fn process_slot(&mut self, index: usize) {
        if index >= self.block.capacity() {
            log::error!("slot index {} out of range", index);
            return;
        }

        let mut frame = self.block.load(index);

        let density_pot = self.pots.get(PotId::Density).value();
        frame = self.density.process(
            density_pot,
            self.params.region_len(),
            self.sample_len,
            frame,
        );

        let fx_pot = self.pots.get(PotId::Fx).value();
        frame.left = self.shaper.process(fx_pot, frame.left);
        frame.right = self.shaper.process(fx_pot, frame.right);

        self.block.store(index, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::message::{message_channel, RenderPort};
    use crate::types::{Frame, SAMPLE_RATE};

    fn worker_pair(block_len: usize) -> (RenderPort, EffectCore, Arc<SharedBlock>) {
        let (render_port, worker_port) = message_channel();
        let block = Arc::new(SharedBlock::new(64));
        block.set_len(block_len);
        let pots = Arc::new(PotBank::new());
        let params = Arc::new(SharedParams::new(true, 48_000));
        let core = EffectCore::new(
            worker_port,
            Arc::clone(&block),
            pots,
            params,
            TransientShaper::new(SAMPLE_RATE),
            48_000,
            Arc::new(AtomicBool::new(true)),
        );
        (render_port, core, block)
    }

    #[test]
    fn test_done_after_exactly_block_size_requests() {
        let (mut render, mut core, _block) = worker_pair(8);

        render.send(Message::Begin);
        for i in 0..8 {
            render.send(Message::SampleRequest(i));
        }
        while core.poll_once() {}

        // barrier must be satisfied now; wait_done returns immediately
        render.wait_done();
    }

    #[test]
    fn test_begin_resets_counter() {
        let (mut render, mut core, _block) = worker_pair(4);

        // half a block, then a fresh Begin: the stale count must not
        // leak into the new block
        render.send(Message::Begin);
        render.send(Message::SampleRequest(0));
        render.send(Message::SampleRequest(1));
        while core.poll_once() {}

        render.send(Message::Begin);
        for i in 0..4 {
            render.send(Message::SampleRequest(i));
        }
        while core.poll_once() {}
        render.wait_done();
    }

    #[test]
    fn test_slots_pass_through_with_effects_at_minimum() {
        let (mut render, mut core, block) = worker_pair(4);

        for i in 0..4 {
            block.store(i, Frame::mono(1000 + i as i16));
        }
        render.send(Message::Begin);
        for i in 0..4 {
            render.send(Message::SampleRequest(i));
        }
        while core.poll_once() {}
        render.wait_done();

        // density below deadzone and shaper at zero leave slots intact
        for i in 0..4 {
            assert_eq!(block.load(i), Frame::mono(1000 + i as i16));
        }
    }

    #[test]
    fn test_idle_poll_returns_false() {
        let (_render, mut core, _block) = worker_pair(4);
        assert!(!core.poll_once());
    }
}
