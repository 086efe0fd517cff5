use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// No room identifier was supplied by the launching context.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no room identifier supplied")]
pub struct MissingRoomError;

#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Resolves the room from an optional query value. Blank values count as missing.
    pub fn resolve(raw: Option<&str>) -> Result<Self, MissingRoomError> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_owned())),
            _ => Err(MissingRoomError),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
