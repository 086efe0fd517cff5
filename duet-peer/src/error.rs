use crate::negotiation::NegotiationState;
use duet_core::MissingRoomError;
use thiserror::Error;

/// A signaling message arrived out of its causal order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no pending offer")]
    NoPendingOffer,

    #[error("room has not been joined")]
    NotJoined,

    #[error("room already joined")]
    AlreadyJoined,

    #[error("negotiation cannot start while {0}")]
    NegotiationInProgress(NegotiationState),
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error(transparent)]
    MissingRoom(#[from] MissingRoomError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The engine rejected a description or failed to build a connection.
    #[error("negotiation error: {0}")]
    Negotiation(String),

    #[error("candidate error: {0}")]
    Candidate(String),

    #[error("signaling error: {0}")]
    Signaling(String),

    #[error("malformed room message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl PeerError {
    pub fn negotiation(err: impl std::fmt::Display) -> Self {
        PeerError::Negotiation(err.to_string())
    }

    pub fn candidate(err: impl std::fmt::Display) -> Self {
        PeerError::Candidate(err.to_string())
    }

    pub fn signaling(err: impl std::fmt::Display) -> Self {
        PeerError::Signaling(err.to_string())
    }
}

pub type Result<T, E = PeerError> = std::result::Result<T, E>;
