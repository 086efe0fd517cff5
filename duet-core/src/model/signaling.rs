use crate::model::description::{IceCandidate, SessionDescription};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            username: None,
            credential: None,
        }
    }
}

/// Message exchanged between the two participants of a room.
///
/// The relay forwards it untouched, so it travels as its own JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoomMessage {
    NewParticipant,
    Offer { offer: SessionDescription },
    Answer { answer: SessionDescription },
    Candidate { candidate: IceCandidate },
}

impl RoomMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RoomMessage::NewParticipant => "newParticipant",
            RoomMessage::Offer { .. } => "offer",
            RoomMessage::Answer { .. } => "answer",
            RoomMessage::Candidate { .. } => "candidate",
        }
    }
}
