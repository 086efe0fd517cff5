mod config;
mod engine;
mod error;
mod media;
mod negotiation;
mod session;
mod signaling;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use media::*;
pub use negotiation::*;
pub use session::*;
pub use signaling::*;
