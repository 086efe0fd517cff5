use duet_core::SignalEnvelope;
use duet_peer::{LocalMedia, NegotiationState, PeerError, ProtocolError};

use crate::integration::{TEST_ROOM, create_test_peer, init_tracing};
use crate::utils::MockEngine;

#[tokio::test]
async fn test_start_sends_exactly_one_join() {
    init_tracing();

    let mut peer = create_test_peer(MockEngine::new());
    assert_eq!(peer.controller.state(), NegotiationState::Idle);

    peer.controller
        .start(LocalMedia::audio_video("local"))
        .await
        .unwrap();

    let envelopes = peer.signaling.envelopes().await;
    assert_eq!(envelopes.len(), 1);
    match &envelopes[0] {
        SignalEnvelope::JoinRoom { room_id } => assert_eq!(room_id.as_str(), TEST_ROOM),
        other => panic!("expected joinRoom, got {other:?}"),
    }
    assert_eq!(
        envelopes[0].to_json().unwrap(),
        format!(r#"{{"action":"joinRoom","roomId":"{TEST_ROOM}"}}"#)
    );
    assert_eq!(peer.controller.state(), NegotiationState::Joining);
    assert_eq!(peer.engine.connection_count().await, 0);
}

#[tokio::test]
async fn test_second_start_is_rejected() {
    init_tracing();

    let mut peer = create_test_peer(MockEngine::new());
    peer.controller
        .start(LocalMedia::audio_video("local"))
        .await
        .unwrap();

    let result = peer.controller.start(LocalMedia::audio_video("local")).await;

    assert!(matches!(
        result,
        Err(PeerError::Protocol(ProtocolError::AlreadyJoined))
    ));
    assert_eq!(peer.signaling.join_count().await, 1);
}
