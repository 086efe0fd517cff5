use crate::config::PeerConfig;
use crate::engine::ConnectionEngine;
use crate::error::{PeerError, Result};
use crate::media::LocalMedia;
use crate::negotiation::{NegotiationController, NegotiationState, SessionObserver};
use crate::session::Lobby;
use crate::signaling::SignalingConnector;
use duet_core::RoomId;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub enum Launch {
    /// No room was given; the lobby has taken over and no channel was opened.
    Lobby,
    Running(SessionHandle),
}

/// Builds one controller per call.
#[derive(Clone)]
pub struct PeerSession {
    config: PeerConfig,
    engine: Arc<dyn ConnectionEngine>,
    observer: Arc<dyn SessionObserver>,
}

impl PeerSession {
    pub fn new(
        config: PeerConfig,
        engine: Arc<dyn ConnectionEngine>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            config,
            engine,
            observer,
        }
    }

    pub async fn launch(
        &self,
        room: Option<&str>,
        media: LocalMedia,
        connector: &dyn SignalingConnector,
        lobby: &dyn Lobby,
    ) -> Result<Launch> {
        let room_id = match RoomId::resolve(room) {
            Ok(room_id) => room_id,
            Err(e) => {
                warn!("{}; redirecting to the lobby", e);
                lobby.redirect(&e);
                return Ok(Launch::Lobby);
            }
        };

        let link = connector.connect().await?;
        let mut controller = NegotiationController::new(
            room_id.clone(),
            &self.config,
            self.engine.clone(),
            link.output,
            self.observer.clone(),
        );
        controller.start(media.clone()).await?;

        let state = controller.subscribe_state();
        let task = tokio::spawn(controller.run(link.inbound));
        info!("Session for room {} running", room_id);

        Ok(Launch::Running(SessionHandle {
            room_id,
            media,
            state,
            task,
        }))
    }
}

pub struct SessionHandle {
    room_id: RoomId,
    media: LocalMedia,
    state: watch::Receiver<NegotiationState>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Local tracks of the call, for the mute and camera toggles.
    pub fn media(&self) -> &LocalMedia {
        &self.media
    }

    pub fn state(&self) -> NegotiationState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<NegotiationState> {
        self.state.clone()
    }

    /// Resolves once the state satisfies `pred`, or errors if the loop has ended first.
    pub async fn wait_for<F>(&mut self, pred: F) -> Result<NegotiationState>
    where
        F: FnMut(&NegotiationState) -> bool,
    {
        self.state
            .wait_for(pred)
            .await
            .map(|state| *state)
            .map_err(|_| PeerError::Signaling("negotiation loop has stopped".to_owned()))
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the signaling channel closes and the loop exits.
    pub async fn closed(self) {
        if let Err(e) = self.task.await {
            warn!("Negotiation loop for room {} ended abnormally: {}", self.room_id, e);
        }
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}
