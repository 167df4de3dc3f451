//! The dual-core synthesis engine
//!
//! Two real-time halves joined by one message channel: the render core
//! ([`RenderCore`]) turns trigger edges and knob state into playback,
//! and the effect core ([`EffectCore`]) runs Density and the Transient
//! Shaper over each handed-off slot. A third, UI-rate half
//! ([`UiControls`]) feeds both through shared atomics.

pub mod block;
pub mod message;
pub mod params;
pub mod player;
pub mod render;
pub mod ui;
pub mod worker;

pub use block::SharedBlock;
pub use message::{message_channel, Message, RenderPort, WorkerPort};
pub use params::SharedParams;
pub use player::SamplePlayer;
pub use render::RenderCore;
pub use ui::UiControls;
pub use worker::EffectCore;
