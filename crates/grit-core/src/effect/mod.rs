//! Fixed-point audio effects for the effect core

pub mod delay_line;
pub mod density;
pub mod shaper;

pub use delay_line::StereoDelayLine;
pub use density::Density;
pub use shaper::TransientShaper;
