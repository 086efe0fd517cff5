use crate::error::Result;
use async_trait::async_trait;
use duet_core::SignalEnvelope;
use tokio::sync::mpsc;

/// Outbound half of the signaling channel: everything the controller says to the relay.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_envelope(&self, envelope: SignalEnvelope) -> Result<()>;
}

/// An open signaling channel. `inbound` yields the raw text of every relay frame.
pub struct SignalingLink {
    pub output: std::sync::Arc<dyn SignalingOutput>,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Opens the signaling channel. Only called once a room has been resolved.
#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn connect(&self) -> Result<SignalingLink>;
}
