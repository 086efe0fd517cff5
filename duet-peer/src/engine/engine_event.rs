use crate::media::RemoteTrack;
use duet_core::IceCandidate;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Callbacks of a connection, delivered to the controller loop.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A local candidate was gathered; `None` marks the end of gathering.
    LocalCandidate {
        candidate: Option<IceCandidate>,
        generated_at: Instant,
    },

    RemoteTrack(RemoteTrack),

    ConnectionStateChanged(ConnectionState),
}

impl EngineEvent {
    pub fn candidate(candidate: Option<IceCandidate>) -> Self {
        EngineEvent::LocalCandidate {
            candidate,
            generated_at: Instant::now(),
        }
    }
}
