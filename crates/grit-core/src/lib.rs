//! Grit Core
//!
//! The synthesis engine of a battery-powered sample-scrubbing
//! instrument: a dual-core real-time pipeline in Q15 fixed point. The
//! render core plays a region of a loaded sample under trigger, scrub,
//! length, and pitch control; the effect core applies the Density
//! dual-delay and a transient shaper per sample; a UI-rate pass
//! acquires layered pot and CV readings in between blocks.
//!
//! Everything processes against pre-allocated buffers; the only
//! blocking point is the per-block completion barrier between the two
//! cores.

pub mod app;
pub mod config;
pub mod control;
pub mod effect;
pub mod engine;
pub mod error;
pub mod hal;
pub mod qmath;
pub mod types;

pub use types::*;
