use crate::engine::{ConnectionEngine, ConnectionHandle, ConnectionState, EngineEvent};
use crate::error::{PeerError, Result};
use crate::media::{LocalMedia, RemoteTrack};
use async_trait::async_trait;
use duet_core::{IceCandidate, IceServerConfig, SdpKind, SessionDescription, TrackKind};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Native engine backed by the `webrtc` crate.
#[derive(Clone)]
pub struct WebRtcEngine {
    ice_servers: Vec<IceServerConfig>,
}

impl WebRtcEngine {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ConnectionEngine for WebRtcEngine {
    async fn create_connection(
        &self,
        media: &LocalMedia,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Box<dyn ConnectionHandle>> {
        let mut m = MediaEngine::default();
        m.register_default_codecs().map_err(PeerError::negotiation)?;
        let registry =
            register_default_interceptors(Registry::new(), &mut m).map_err(PeerError::negotiation)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let peer_connection = Arc::new(
            api.new_peer_connection(self.rtc_configuration())
                .await
                .map_err(PeerError::negotiation)?,
        );

        for track in media.tracks() {
            let mime_type = match track.kind() {
                TrackKind::Audio => MIME_TYPE_OPUS,
                TrackKind::Video => MIME_TYPE_VP8,
            };
            let local = Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: mime_type.to_owned(),
                    ..Default::default()
                },
                track.id().to_owned(),
                track.stream_id().to_owned(),
            ));
            peer_connection
                .add_track(local as Arc<dyn TrackLocal + Send + Sync>)
                .await
                .map_err(PeerError::negotiation)?;
            debug!("Attached local {} track {}", track.kind(), track.id());
        }

        let state_tx = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => ConnectionState::Connecting,
                        RTCPeerConnectionState::Connected => ConnectionState::Connected,
                        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
                        RTCPeerConnectionState::Failed => ConnectionState::Failed,
                        RTCPeerConnectionState::Closed => ConnectionState::Closed,
                        _ => ConnectionState::New,
                    };
                    let _ = tx.send(EngineEvent::ConnectionStateChanged(state)).await;
                })
            },
        ));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let candidate = match c {
                    Some(candidate) => match candidate.to_json() {
                        Ok(init) => Some(candidate_from_init(init)),
                        Err(e) => {
                            debug!("Dropping unserializable local candidate: {}", e);
                            return;
                        }
                    },
                    None => None,
                };
                let _ = tx.send(EngineEvent::candidate(candidate)).await;
            })
        }));

        let track_tx = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Video => TrackKind::Video,
                        _ => TrackKind::Audio,
                    };
                    let remote = RemoteTrack {
                        id: track.id(),
                        kind,
                        stream_id: track.stream_id(),
                    };
                    let _ = tx.send(EngineEvent::RemoteTrack(remote)).await;
                })
            },
        ));

        Ok(Box::new(WebRtcConnection { peer_connection }))
    }
}

struct WebRtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

#[async_trait]
impl ConnectionHandle for WebRtcConnection {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(PeerError::negotiation)?;
        description_from_rtc(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(PeerError::negotiation)?;
        description_from_rtc(answer)
    }

    async fn set_local_description(&self, description: SessionDescription) -> Result<()> {
        let desc = description_to_rtc(description)?;
        self.peer_connection
            .set_local_description(desc)
            .await
            .map_err(PeerError::negotiation)
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let desc = description_to_rtc(description)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(PeerError::negotiation)
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(PeerError::candidate)
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .map_err(PeerError::negotiation)
    }
}

fn candidate_from_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}

fn description_to_rtc(description: SessionDescription) -> Result<RTCSessionDescription> {
    let SessionDescription { kind, sdp } = description;
    let parsed = match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp),
        SdpKind::Answer => RTCSessionDescription::answer(sdp),
        SdpKind::Pranswer => RTCSessionDescription::pranswer(sdp),
        SdpKind::Rollback => {
            return Err(PeerError::Negotiation(
                "rollback descriptions are not supported".to_owned(),
            ));
        }
    };
    parsed.map_err(PeerError::negotiation)
}

fn description_from_rtc(description: RTCSessionDescription) -> Result<SessionDescription> {
    let kind = match description.sdp_type {
        RTCSdpType::Offer => SdpKind::Offer,
        RTCSdpType::Answer => SdpKind::Answer,
        RTCSdpType::Pranswer => SdpKind::Pranswer,
        RTCSdpType::Rollback => SdpKind::Rollback,
        other => {
            return Err(PeerError::Negotiation(format!(
                "engine produced a description of type {other:?}"
            )));
        }
    };
    Ok(SessionDescription {
        kind,
        sdp: description.sdp,
    })
}
