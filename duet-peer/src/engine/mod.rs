mod connection_engine;
mod engine_event;
mod webrtc_engine;

pub use connection_engine::*;
pub use engine_event::*;
pub use webrtc_engine::*;
