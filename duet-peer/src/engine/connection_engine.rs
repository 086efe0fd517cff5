use crate::engine::EngineEvent;
use crate::error::Result;
use crate::media::LocalMedia;
use async_trait::async_trait;
use duet_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

/// Factory for peer connections.
#[async_trait]
pub trait ConnectionEngine: Send + Sync {
    /// Builds a connection carrying every track of `media`.
    /// Candidate, track and state callbacks of the connection are pushed into `events`.
    async fn create_connection(
        &self,
        media: &LocalMedia,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Box<dyn ConnectionHandle>>;
}

/// The single live connection of a room session.
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    /// Fails with `PeerError::Candidate` when the engine refuses the candidate.
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}
