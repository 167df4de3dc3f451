//! Panel controls: layered pot readers and the pitch quantizer

pub mod pot;
pub mod quantizer;

pub use pot::{Pot, PotBank, PotId};
pub use quantizer::{Quantizer, Scale};
