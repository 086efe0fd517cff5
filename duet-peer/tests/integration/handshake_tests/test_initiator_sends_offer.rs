use duet_core::{RoomMessage, SessionDescription, SignalEnvelope};
use duet_peer::{NegotiationState, Role};

use crate::integration::{TEST_ROOM, create_joined_peer, init_tracing};
use crate::utils::{EngineCall, MockEngine, inner_message};

#[tokio::test]
async fn test_new_participant_makes_this_peer_the_initiator() {
    init_tracing();

    let mut peer = create_joined_peer(MockEngine::new()).await;

    peer.controller
        .on_room_message(RoomMessage::NewParticipant)
        .await
        .expect("offer round failed");

    // Exactly one envelope, carrying a non-empty offer
    let envelope = peer.signal_rx.try_recv().expect("offer envelope");
    assert!(peer.signal_rx.try_recv().is_err());
    assert_eq!(envelope.room_id().as_str(), TEST_ROOM);
    assert!(matches!(envelope, SignalEnvelope::SendMsgToRoom { .. }));

    let RoomMessage::Offer { offer } = inner_message(&envelope) else {
        panic!("expected an offer");
    };
    assert!(!offer.sdp.is_empty());

    // The offer was set locally before it was sent
    assert_eq!(
        peer.engine.calls().await,
        vec![
            EngineCall::CreateConnection {
                tracks: vec!["local-audio".to_owned(), "local-video".to_owned()],
            },
            EngineCall::CreateOffer,
            EngineCall::SetLocal(offer),
        ]
    );
    assert_eq!(peer.controller.state(), NegotiationState::AwaitingAnswer);
    assert_eq!(peer.controller.role(), Some(Role::Initiator));
}

#[tokio::test]
async fn test_answer_completes_the_initiator_round() {
    init_tracing();

    let mut peer = create_joined_peer(MockEngine::new()).await;
    peer.controller
        .on_room_message(RoomMessage::NewParticipant)
        .await
        .unwrap();
    let _offer = peer.signal_rx.recv().await.unwrap();

    let answer = SessionDescription::answer("v=0\r\ns=remote-answer\r\n");
    peer.controller
        .on_room_message(RoomMessage::Answer {
            answer: answer.clone(),
        })
        .await
        .expect("answer rejected");

    assert_eq!(peer.controller.state(), NegotiationState::Connected);
    assert_eq!(peer.engine.remote_descriptions().await, vec![answer]);
    assert_eq!(peer.engine.local_descriptions().await.len(), 1);
    assert_eq!(peer.engine.connection_count().await, 1);

    // Nothing is sent back for an answer
    assert!(peer.signal_rx.try_recv().is_err());
}
