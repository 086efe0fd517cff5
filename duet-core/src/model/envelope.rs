use crate::model::room::RoomId;
use crate::model::signaling::RoomMessage;
use serde::{Deserialize, Serialize};

/// Outbound unit sent to the room relay.
///
/// `message` carries an already encoded [`RoomMessage`], so the relay can fan it out
/// without looking inside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum SignalEnvelope {
    #[serde(rename = "joinRoom", rename_all = "camelCase")]
    JoinRoom { room_id: RoomId },

    #[serde(rename = "sendMsgToRoom", rename_all = "camelCase")]
    SendMsgToRoom { room_id: RoomId, message: String },
}

impl SignalEnvelope {
    pub fn join(room_id: RoomId) -> Self {
        SignalEnvelope::JoinRoom { room_id }
    }

    pub fn to_room(room_id: RoomId, message: &RoomMessage) -> Result<Self, serde_json::Error> {
        Ok(SignalEnvelope::SendMsgToRoom {
            room_id,
            message: message.encode()?,
        })
    }

    pub fn room_id(&self) -> &RoomId {
        match self {
            SignalEnvelope::JoinRoom { room_id } | SignalEnvelope::SendMsgToRoom { room_id, .. } => {
                room_id
            }
        }
    }

    /// Decodes the nested room message, `None` for a join.
    pub fn room_message(&self) -> Option<Result<RoomMessage, serde_json::Error>> {
        match self {
            SignalEnvelope::JoinRoom { .. } => None,
            SignalEnvelope::SendMsgToRoom { message, .. } => Some(RoomMessage::decode(message)),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
