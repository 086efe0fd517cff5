use crate::error::PeerError;
use crate::media::RemoteStream;

/// Caller-side sink for what the controller produces besides signaling traffic.
pub trait SessionObserver: Send + Sync {
    /// Called with the whole stream every time a new remote track is added.
    fn on_remote_stream(&self, _stream: &RemoteStream) {}

    fn on_failure(&self, _error: &PeerError) {}
}

/// Observer that ignores everything; errors still reach the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
