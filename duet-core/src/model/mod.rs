mod description;
mod envelope;
mod media;
mod room;
mod signaling;

pub use description::{IceCandidate, SdpKind, SessionDescription};
pub use envelope::SignalEnvelope;
pub use media::TrackKind;
pub use room::{MissingRoomError, RoomId};
pub use signaling::{IceServerConfig, RoomMessage};
