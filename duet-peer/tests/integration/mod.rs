
use std::sync::Arc;
use std::time::Duration;

use duet_core::{RoomId, SignalEnvelope};
use duet_peer::{LocalMedia, NegotiationController, PeerConfig};
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::{MockEngine, MockSignalingOutput, RecordingObserver};

pub const TEST_ROOM: &str = "test-room";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> PeerConfig {
    PeerConfig::default()
        .with_ice_servers(Vec::new())
        .with_candidate_flush_delay(Duration::from_millis(100))
}

pub struct TestPeer {
    pub controller: NegotiationController,
    pub engine: MockEngine,
    pub signaling: MockSignalingOutput,
    pub signal_rx: mpsc::UnboundedReceiver<SignalEnvelope>,
    pub observer: Arc<RecordingObserver>,
}

pub fn create_test_peer(engine: MockEngine) -> TestPeer {
    let (signaling, signal_rx) = MockSignalingOutput::new();
    let observer = Arc::new(RecordingObserver::default());

    let controller = NegotiationController::new(
        RoomId::new(TEST_ROOM),
        &test_config(),
        Arc::new(engine.clone()),
        Arc::new(signaling.clone()),
        observer.clone(),
    );

    TestPeer {
        controller,
        engine,
        signaling,
        signal_rx,
        observer,
    }
}

/// A peer that has already joined the room; the join envelope is consumed.
pub async fn create_joined_peer(engine: MockEngine) -> TestPeer {
    let mut peer = create_test_peer(engine);
    peer.controller
        .start(LocalMedia::audio_video("local"))
        .await
        .expect("start failed");

    let join = peer.signal_rx.recv().await.expect("join envelope");
    assert!(matches!(join, SignalEnvelope::JoinRoom { .. }));
    peer
}
