mod candidate_queue;
mod controller;
mod negotiation_state;
mod session_observer;

pub use candidate_queue::*;
pub use controller::*;
pub use negotiation_state::*;
pub use session_observer::*;
