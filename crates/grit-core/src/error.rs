//! Engine error types

use thiserror::Error;

use crate::types::MAX_BLOCK_SIZE;

/// Errors that can occur while assembling the engine
///
/// The audio path itself never returns errors: before initialization the
/// callback is a strict no-op, and cross-core protocol invariants are
/// upheld by construction rather than checked at runtime.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No sample data to play
    #[error("sample is empty")]
    EmptySample,

    /// Configured block size exceeds the pre-allocated maximum
    #[error("block size {0} exceeds maximum {MAX_BLOCK_SIZE}")]
    BlockTooLarge(usize),

    /// Sample rate must be non-zero
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
}

/// Result type for engine assembly
pub type EngineResult<T> = Result<T, EngineError>;
