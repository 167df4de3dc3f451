//! Inter-core message channel
//!
//! The only synchronization primitive between the render core and the
//! effect core: a pair of bounded lock-free SPSC rings (requests one
//! way, completion the other) plus park/wake handles for the two places
//! a core is allowed to sleep.
//!
//! The channel never synthesizes, reorders or drops messages. Capacity
//! is sized so a protocol-abiding sender can never fill it; an over-full
//! push is a protocol violation that gets logged and the message
//! discarded — by then the block is already lost and the render core
//! will hang on the barrier, which is the designed failure mode.

use std::time::Duration;

use crossbeam::sync::{Parker, Unparker};

use crate::types::MAX_BLOCK_SIZE;

/// Messages exchanged between the two cores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Start of a block: the worker resets its processed-sample counter
    Begin,
    /// Slot `index` has been written and is handed to the effect core
    SampleRequest(usize),
    /// The effect core finished every slot of the block
    Done,
}

/// Request ring capacity: one `Begin` plus a full block of requests,
/// with a slot to spare so the ring is never operated at the boundary.
pub const CHANNEL_CAPACITY: usize = MAX_BLOCK_SIZE + 2;

/// Render-side endpoint: sends requests, blocks on completion
pub struct RenderPort {
    requests: rtrb::Producer<Message>,
    done: rtrb::Consumer<Message>,
    worker_wake: Unparker,
    barrier: Parker,
}

/// Effect-side endpoint: polls requests, signals completion
pub struct WorkerPort {
    requests: rtrb::Consumer<Message>,
    done: rtrb::Producer<Message>,
    render_wake: Unparker,
    idle: Parker,
}

/// Create a connected render/worker endpoint pair
pub fn message_channel() -> (RenderPort, WorkerPort) {
    let (req_tx, req_rx) = rtrb::RingBuffer::new(CHANNEL_CAPACITY);
    let (done_tx, done_rx) = rtrb::RingBuffer::new(4);
    let barrier = Parker::new();
    let idle = Parker::new();
    let render_wake = barrier.unparker().clone();
    let worker_wake = idle.unparker().clone();
    (
        RenderPort {
            requests: req_tx,
            done: done_rx,
            worker_wake,
            barrier,
        },
        WorkerPort {
            requests: req_rx,
            done: done_tx,
            render_wake,
            idle,
        },
    )
}

impl RenderPort {
    /// Enqueue a message without blocking and wake the worker
    pub fn send(&mut self, msg: Message) {
        if self.requests.push(msg).is_err() {
            // capacity is a protocol precondition, not a channel concern
            log::error!("message channel full, dropped {:?}", msg);
        }
        self.worker_wake.unpark();
    }

    /// Block until the worker signals `Done`
    ///
    /// This is the single designed barrier of the render core. There is
    /// no timeout: if the completion never arrives the render core
    /// deadlocks, which is the protocol's fatal failure mode.
    pub fn wait_done(&mut self) {
        loop {
            match self.done.pop() {
                Ok(Message::Done) => return,
                Ok(other) => log::warn!("unexpected message on completion ring: {:?}", other),
                Err(_) => self.barrier.park(),
            }
        }
    }
}

impl WorkerPort {
    /// Poll for the next request without blocking
    #[inline]
    pub fn try_receive(&mut self) -> Option<Message> {
        self.requests.pop().ok()
    }

    /// Sleep briefly while the request ring is empty
    ///
    /// Bounded so the run-loop condition keeps getting sampled; a send
    /// from the render core wakes the worker immediately.
    pub fn idle_wait(&self) {
        self.idle.park_timeout(Duration::from_micros(200));
    }

    /// Signal block completion and wake the render core
    pub fn send_done(&mut self) {
        if self.done.push(Message::Done).is_err() {
            log::error!("completion ring full, Done dropped");
        }
        self.render_wake.unpark();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order_preserved() {
        let (mut render, mut worker) = message_channel();

        render.send(Message::Begin);
        for i in 0..8 {
            render.send(Message::SampleRequest(i));
        }

        assert_eq!(worker.try_receive(), Some(Message::Begin));
        for i in 0..8 {
            assert_eq!(worker.try_receive(), Some(Message::SampleRequest(i)));
        }
        assert_eq!(worker.try_receive(), None);
    }

    #[test]
    fn test_full_block_fits() {
        let (mut render, mut worker) = message_channel();

        render.send(Message::Begin);
        for i in 0..MAX_BLOCK_SIZE {
            render.send(Message::SampleRequest(i));
        }

        let mut received = 0;
        while worker.try_receive().is_some() {
            received += 1;
        }
        assert_eq!(received, MAX_BLOCK_SIZE + 1);
    }

    #[test]
    fn test_done_crosses_before_barrier() {
        let (mut render, mut worker) = message_channel();
        worker.send_done();
        // token is already there; wait_done must return without parking
        render.wait_done();
    }

    #[test]
    fn test_barrier_wakes_from_other_thread() {
        let (mut render, mut worker) = message_channel();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            worker.send_done();
        });
        render.wait_done();
        handle.join().unwrap();
    }

    #[test]
    fn test_message_is_small() {
        // two words: keeps ring traffic within a cache line per push
        assert!(std::mem::size_of::<Message>() <= 16);
    }
}
