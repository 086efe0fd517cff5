use std::fmt;

/// Progress of the offer/answer handshake for one room.
///
/// There is no way back to `Idle`: renegotiation is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    /// `joinRoom` sent, waiting for a participant or an offer.
    Joining,
    Offering,
    AwaitingAnswer,
    Answering,
    /// Both descriptions are set. Candidates and media keep flowing afterwards.
    Connected,
    Failed,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::Joining => "joining",
            NegotiationState::Offering => "offering",
            NegotiationState::AwaitingAnswer => "awaiting answer",
            NegotiationState::Answering => "answering",
            NegotiationState::Connected => "connected",
            NegotiationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}
