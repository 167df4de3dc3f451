//! Engine configuration
//!
//! Small serde-backed config with a forgiving YAML loader: a missing or
//! invalid file falls back to defaults with a warning, so a corrupt
//! config on the SD card can never brick the instrument.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control::quantizer::Scale;
use crate::error::{EngineError, EngineResult};
use crate::types::{MAX_BLOCK_SIZE, SAMPLE_RATE};

/// Tunable engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Frames per audio block (must not exceed [`MAX_BLOCK_SIZE`])
    pub block_size: usize,
    /// Whether playback free-runs without an external trigger
    pub autoplay: bool,
    /// Musical scale the pitch quantizer snaps to
    pub scale: Scale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            block_size: 256,
            autoplay: true,
            scale: Scale::Minor,
        }
    }
}

impl EngineConfig {
    /// Check the config for values the engine cannot run with
    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(EngineError::BlockTooLarge(self.block_size));
        }
        Ok(())
    }
}

/// Load an [`EngineConfig`] from a YAML file
///
/// If the file doesn't exist or fails to parse, returns the default
/// config and logs what happened.
pub fn load_config(path: &Path) -> EngineConfig {
    if !path.exists() {
        log::info!("load_config: {:?} doesn't exist, using defaults", path);
        return EngineConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<EngineConfig>(&contents) {
            Ok(config) => {
                log::info!("load_config: loaded {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse config: {}, using defaults", e);
                EngineConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read config file: {}, using defaults", e);
            EngineConfig::default()
        }
    }
}
