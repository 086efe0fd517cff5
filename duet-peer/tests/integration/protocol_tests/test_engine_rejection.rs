use std::time::Duration;

use duet_core::{RoomMessage, SessionDescription};
use duet_peer::{EngineEvent, NegotiationState, PeerError};

use crate::integration::{create_joined_peer, init_tracing};
use crate::utils::{EngineCall, MockEngine, candidate};

#[tokio::test]
async fn test_rejected_offer_abandons_the_round() {
    init_tracing();

    let engine = MockEngine::new().rejecting_remote_descriptions();
    let mut peer = create_joined_peer(engine.clone()).await;

    peer.controller
        .on_room_message(RoomMessage::Candidate {
            candidate: candidate(1),
        })
        .await
        .unwrap();

    let result = peer
        .controller
        .on_room_message(RoomMessage::Offer {
            offer: SessionDescription::offer("not sdp"),
        })
        .await;

    assert!(matches!(result, Err(PeerError::Negotiation(_))));
    assert_eq!(peer.controller.state(), NegotiationState::Failed);
    assert_eq!(peer.controller.buffered_remote_candidates(), 0);
    assert_eq!(engine.calls().await.last(), Some(&EngineCall::Close));
    assert!(peer.signaling.room_messages().await.is_empty());

    // Later traffic for the abandoned round is ignored
    peer.controller
        .on_room_message(RoomMessage::Candidate {
            candidate: candidate(2),
        })
        .await
        .unwrap();
    assert!(engine.added_candidates().await.is_empty());
}

#[tokio::test]
async fn test_rejected_answer_abandons_the_round() {
    init_tracing();

    let engine = MockEngine::new().rejecting_remote_descriptions();
    let mut peer = create_joined_peer(engine.clone()).await;
    peer.controller
        .on_room_message(RoomMessage::NewParticipant)
        .await
        .unwrap();

    let result = peer
        .controller
        .on_room_message(RoomMessage::Answer {
            answer: SessionDescription::answer("not sdp"),
        })
        .await;

    assert!(matches!(result, Err(PeerError::Negotiation(_))));
    assert_eq!(peer.controller.state(), NegotiationState::Failed);
    assert_eq!(engine.calls().await.last(), Some(&EngineCall::Close));
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_round_sends_no_local_candidates() {
    init_tracing();

    let engine = MockEngine::new().rejecting_remote_descriptions();
    let mut peer = create_joined_peer(engine).await;
    peer.controller
        .on_room_message(RoomMessage::NewParticipant)
        .await
        .unwrap();
    let _offer = peer.signal_rx.recv().await.unwrap();

    peer.controller
        .on_engine_event(EngineEvent::candidate(Some(candidate(1))))
        .await;
    assert_eq!(peer.controller.pending_local_candidates(), 1);

    let result = peer
        .controller
        .on_room_message(RoomMessage::Answer {
            answer: SessionDescription::answer("not sdp"),
        })
        .await;
    assert!(result.is_err());
    assert_eq!(peer.controller.pending_local_candidates(), 0);

    peer.controller
        .on_engine_event(EngineEvent::candidate(Some(candidate(2))))
        .await;
    peer.controller
        .on_engine_event(EngineEvent::candidate(Some(candidate(3))))
        .await;
    assert_eq!(peer.controller.pending_local_candidates(), 0);

    tokio::time::advance(Duration::from_millis(150)).await;
    peer.controller.flush_candidates().await.unwrap();
    assert!(peer.signal_rx.try_recv().is_err());
}
