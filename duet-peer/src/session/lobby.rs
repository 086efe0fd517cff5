use duet_core::MissingRoomError;

/// Where control goes when a session is launched without a room.
pub trait Lobby: Send + Sync {
    fn redirect(&self, reason: &MissingRoomError);
}
