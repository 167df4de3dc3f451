//! Shared audio block
//!
//! The per-block handoff surface between the cores. Each slot holds one
//! packed stereo frame in a single atomic word, so a slot transfer is
//! tear-free without locks. Ownership discipline is purely protocol:
//! the render core writes slot `i` strictly before sending
//! `SampleRequest(i)` and never revisits it; the effect core touches it
//! only after receiving that message, exactly once.
//!
//! All accesses are `Relaxed` — the rtrb push/pop on the message ring
//! provides the release/acquire fence that orders slot writes against
//! slot reads.
//!
//! Slot contents deliberately persist across blocks: when playback is
//! gated off the render core skips the write and the effect core
//! processes whatever the slot last held.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::types::Frame;

/// Fixed pool of handoff slots
pub struct SharedBlock {
    slots: Box<[AtomicU32]>,
    len: AtomicUsize,
}

impl SharedBlock {
    /// Allocate `capacity` slots, all silent
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| AtomicU32::new(0)).collect(),
            len: AtomicUsize::new(0),
        }
    }

    /// Number of slots allocated
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Set the active length for the current block (render core, pre-`Begin`)
    #[inline]
    pub fn set_len(&self, len: usize) {
        self.len.store(len, Ordering::Relaxed);
    }

    /// Active length of the block in flight
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// True when no block has been published yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a frame into a slot
    #[inline]
    pub fn store(&self, index: usize, frame: Frame) {
        self.slots[index].store(frame.pack(), Ordering::Relaxed);
    }

    /// Load a frame from a slot
    #[inline]
    pub fn load(&self, index: usize) -> Frame {
        Frame::unpack(self.slots[index].load(Ordering::Relaxed))
    }
}
