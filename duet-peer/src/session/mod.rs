mod lobby;
mod peer_session;

pub use lobby::*;
pub use peer_session::*;
