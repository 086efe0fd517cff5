use std::sync::Arc;
use std::time::Duration;

use duet_core::RoomId;
use duet_peer::{Launch, LocalMedia, NegotiationState, PeerSession, SessionHandle};

use crate::integration::{TEST_ROOM, init_tracing, test_config};
use crate::utils::{LoopbackRelay, MockEngine, RecordingLobby, RecordingObserver, RelayConnector};

async fn launch(
    engine: &MockEngine,
    connector: &RelayConnector,
    lobby: &RecordingLobby,
    stream_id: &str,
) -> SessionHandle {
    let session = PeerSession::new(
        test_config(),
        Arc::new(engine.clone()),
        Arc::new(RecordingObserver::default()),
    );
    let launch = session
        .launch(
            Some(TEST_ROOM),
            LocalMedia::audio_video(stream_id),
            connector,
            lobby,
        )
        .await
        .expect("launch failed");

    match launch {
        Launch::Running(handle) => handle,
        Launch::Lobby => panic!("room was given, lobby must not be used"),
    }
}

#[tokio::test]
async fn test_two_sessions_connect_through_one_relay() {
    init_tracing();

    let relay = LoopbackRelay::new();
    let connector = RelayConnector::new(relay.clone());
    let lobby = RecordingLobby::default();
    let engine_a = MockEngine::new();
    let engine_b = MockEngine::new();

    let mut a = launch(&engine_a, &connector, &lobby, "a").await;
    let mut b = launch(&engine_b, &connector, &lobby, "b").await;
    assert_eq!(a.room_id(), &RoomId::new(TEST_ROOM));

    let connected = |s: &NegotiationState| *s == NegotiationState::Connected;
    let timeout = Duration::from_secs(5);
    tokio::time::timeout(timeout, a.wait_for(connected))
        .await
        .expect("A never connected")
        .unwrap();
    tokio::time::timeout(timeout, b.wait_for(connected))
        .await
        .expect("B never connected")
        .unwrap();

    assert_eq!(connector.connects(), 2);
    assert_eq!(lobby.redirects(), 0);
    assert_eq!(relay.room_size(&RoomId::new(TEST_ROOM)), 2);
    assert!(!a.is_finished());

    // Toggles flip the shared flag the engine sees
    assert_eq!(a.media().toggle_mic(), Some(false));
    assert!(!a.media().audio_track().unwrap().is_enabled());
    assert_eq!(a.media().toggle_camera(), Some(false));
    assert_eq!(a.media().toggle_camera(), Some(true));

    a.abort();
    b.abort();
}
