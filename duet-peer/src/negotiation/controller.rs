use crate::config::PeerConfig;
use crate::engine::{ConnectionEngine, ConnectionHandle, EngineEvent};
use crate::error::{PeerError, ProtocolError, Result};
use crate::media::{LocalMedia, RemoteStream};
use crate::negotiation::{CandidateQueue, NegotiationState, Role, SessionObserver};
use crate::signaling::SignalingOutput;
use duet_core::{IceCandidate, RoomId, RoomMessage, SessionDescription, SignalEnvelope};
use std::future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

const ENGINE_EVENT_CAPACITY: usize = 256;
const MAX_EARLY_CANDIDATES: usize = 64;

/// Drives the offer/answer/ICE exchange for exactly one room.
///
/// The role is not configured: a `newParticipant` notification makes this side the
/// initiator, an `offer` makes it the responder.
pub struct NegotiationController {
    room_id: RoomId,
    engine: Arc<dyn ConnectionEngine>,
    signaling: Arc<dyn SignalingOutput>,
    observer: Arc<dyn SessionObserver>,
    local_media: Option<LocalMedia>,
    connection: Option<Box<dyn ConnectionHandle>>,
    role: Option<Role>,
    state_tx: watch::Sender<NegotiationState>,
    /// Remote candidates that arrived before the remote description.
    early_candidates: Vec<IceCandidate>,
    outbound: CandidateQueue,
    remote_stream: RemoteStream,
    engine_tx: mpsc::Sender<EngineEvent>,
    engine_rx: mpsc::Receiver<EngineEvent>,
}

impl NegotiationController {
    pub fn new(
        room_id: RoomId,
        config: &PeerConfig,
        engine: Arc<dyn ConnectionEngine>,
        signaling: Arc<dyn SignalingOutput>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let (engine_tx, engine_rx) = mpsc::channel(ENGINE_EVENT_CAPACITY);
        let (state_tx, _) = watch::channel(NegotiationState::Idle);

        Self {
            room_id,
            engine,
            signaling,
            observer,
            local_media: None,
            connection: None,
            role: None,
            state_tx,
            early_candidates: Vec::new(),
            outbound: CandidateQueue::new(config.candidate_flush_delay),
            remote_stream: RemoteStream::default(),
            engine_tx,
            engine_rx,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn state(&self) -> NegotiationState {
        *self.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<NegotiationState> {
        self.state_tx.subscribe()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn remote_stream(&self) -> &RemoteStream {
        &self.remote_stream
    }

    pub fn pending_local_candidates(&self) -> usize {
        self.outbound.len()
    }

    pub fn buffered_remote_candidates(&self) -> usize {
        self.early_candidates.len()
    }

    /// Joins the room with the tracks every future connection will carry.
    pub async fn start(&mut self, media: LocalMedia) -> Result<()> {
        if self.state() != NegotiationState::Idle {
            return Err(ProtocolError::AlreadyJoined.into());
        }

        info!("Joining room {}", self.room_id);
        self.signaling
            .send_envelope(SignalEnvelope::join(self.room_id.clone()))
            .await?;

        self.local_media = Some(media);
        self.set_state(NegotiationState::Joining);
        Ok(())
    }

    /// Single entry point for relay traffic.
    pub async fn on_room_message(&mut self, msg: RoomMessage) -> Result<()> {
        debug!("Room {} received {}", self.room_id, msg.kind());

        match msg {
            RoomMessage::NewParticipant => self.make_offer().await,
            RoomMessage::Offer { offer } => self.answer_offer(offer).await,
            RoomMessage::Answer { answer } => self.accept_answer(answer).await,
            RoomMessage::Candidate { candidate } => self.add_remote_candidate(candidate).await,
        }
    }

    pub async fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::LocalCandidate {
                candidate,
                generated_at,
            } => {
                if self.state() == NegotiationState::Failed {
                    debug!("Dropping local candidate of abandoned negotiation");
                    return;
                }
                if !self.outbound.schedule(candidate, generated_at) {
                    debug!("ICE gathering complete for room {}", self.room_id);
                }
            }

            EngineEvent::RemoteTrack(track) => {
                info!("Remote {} track {} received", track.kind, track.id);
                if self.remote_stream.add_track(track) {
                    self.observer.on_remote_stream(&self.remote_stream);
                } else {
                    debug!("Remote track ignored: already present or from another stream");
                }
            }

            EngineEvent::ConnectionStateChanged(state) => {
                info!("Connection for room {} is now {:?}", self.room_id, state);
            }
        }
    }

    /// Sends every queued local candidate whose delay has elapsed.
    ///
    /// A candidate leaves the queue only once it was sent, so a failed send is retried
    /// on the next flush.
    pub async fn flush_candidates(&mut self) -> Result<()> {
        let now = Instant::now();
        while let Some(candidate) = self.outbound.peek_due(now).cloned() {
            self.send_to_room(&RoomMessage::Candidate { candidate }).await?;
            self.outbound.pop_due(now);
        }
        Ok(())
    }

    /// Event loop: relay frames, engine callbacks and the candidate timer, one at a time.
    /// Ends when the inbound side of the signaling channel closes.
    pub async fn run(mut self, mut inbound: mpsc::UnboundedReceiver<String>) {
        info!("Negotiation loop started for room {}", self.room_id);

        loop {
            let deadline = self.outbound.next_deadline();

            tokio::select! {
                frame = inbound.recv() => {
                    match frame {
                        Some(text) => self.handle_frame(&text).await,
                        None => {
                            info!("Signaling channel closed. Stopping negotiation loop.");
                            break;
                        }
                    }
                }

                Some(event) = self.engine_rx.recv() => {
                    self.on_engine_event(event).await;
                }

                _ = wait_until(deadline) => {
                    if let Err(e) = self.flush_candidates().await {
                        self.outbound.postpone_due(Instant::now());
                        self.report(e);
                    }
                }
            }
        }

        info!("Negotiation loop finished for room {}", self.room_id);
    }

    async fn handle_frame(&mut self, text: &str) {
        let result = match RoomMessage::decode(text) {
            Ok(msg) => self.on_room_message(msg).await,
            Err(e) => Err(PeerError::Malformed(e)),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    async fn make_offer(&mut self) -> Result<()> {
        self.begin_round(Role::Initiator, NegotiationState::Offering)?;

        let result = self.offer_round().await;
        self.finish_round(result, NegotiationState::AwaitingAnswer)
            .await
    }

    async fn offer_round(&mut self) -> Result<()> {
        let connection = self.open_connection().await?;

        let offer = connection.create_offer().await?;
        connection.set_local_description(offer.clone()).await?;

        info!("Sending offer to room {}", self.room_id);
        self.send_to_room(&RoomMessage::Offer { offer }).await
    }

    async fn answer_offer(&mut self, offer: SessionDescription) -> Result<()> {
        self.begin_round(Role::Responder, NegotiationState::Answering)?;

        let result = self.answer_round(offer).await;
        self.finish_round(result, NegotiationState::Connected).await
    }

    async fn answer_round(&mut self, offer: SessionDescription) -> Result<()> {
        let connection = self.open_connection().await?;

        connection.set_remote_description(offer).await?;
        self.replay_early_candidates().await;

        let connection = self.connection()?;
        let answer = connection.create_answer().await?;
        connection.set_local_description(answer.clone()).await?;

        info!("Sending answer to room {}", self.room_id);
        self.send_to_room(&RoomMessage::Answer { answer }).await
    }

    async fn accept_answer(&mut self, answer: SessionDescription) -> Result<()> {
        if self.state() != NegotiationState::AwaitingAnswer {
            return Err(ProtocolError::NoPendingOffer.into());
        }
        let connection = self.connection().map_err(|_| ProtocolError::NoPendingOffer)?;

        let result = connection.set_remote_description(answer).await;
        self.finish_round(result, NegotiationState::Connected)
            .await?;

        info!("Remote description set (answer) for room {}", self.room_id);
        self.replay_early_candidates().await;
        Ok(())
    }

    async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> Result<()> {
        match self.state() {
            NegotiationState::Connected => {
                self.connection()?
                    .add_ice_candidate(candidate)
                    .await
            }
            NegotiationState::Failed => {
                debug!("Dropping candidate for abandoned negotiation");
                Ok(())
            }
            _ if self.early_candidates.len() >= MAX_EARLY_CANDIDATES => {
                warn!(
                    "Room {}: {} early candidates already buffered, dropping one",
                    self.room_id, MAX_EARLY_CANDIDATES
                );
                Ok(())
            }
            _ => {
                debug!("Buffering early candidate for room {}", self.room_id);
                self.early_candidates.push(candidate);
                Ok(())
            }
        }
    }

    async fn replay_early_candidates(&mut self) {
        let buffered = std::mem::take(&mut self.early_candidates);
        if buffered.is_empty() {
            return;
        }

        debug!("Replaying {} early candidates", buffered.len());
        for candidate in buffered {
            let result = match self.connection.as_deref() {
                Some(connection) => connection.add_ice_candidate(candidate).await,
                None => return,
            };
            if let Err(e) = result {
                self.report(e);
            }
        }
    }

    fn begin_round(&mut self, role: Role, next: NegotiationState) -> Result<()> {
        match self.state() {
            NegotiationState::Joining => {
                self.role = Some(role);
                self.set_state(next);
                Ok(())
            }
            NegotiationState::Idle => Err(ProtocolError::NotJoined.into()),
            other => Err(ProtocolError::NegotiationInProgress(other).into()),
        }
    }

    /// Applies the outcome of an engine step: advance on success, abandon the round on failure.
    async fn finish_round(&mut self, result: Result<()>, next: NegotiationState) -> Result<()> {
        match result {
            Ok(()) => {
                self.set_state(next);
                Ok(())
            }
            Err(e) => {
                error!("Negotiation for room {} abandoned: {}", self.room_id, e);
                self.set_state(NegotiationState::Failed);
                self.early_candidates.clear();
                self.outbound.clear();
                if let Some(connection) = self.connection.as_deref() {
                    if let Err(close_err) = connection.close().await {
                        warn!("Failed to close connection: {}", close_err);
                    }
                }
                Err(e)
            }
        }
    }

    async fn open_connection(&mut self) -> Result<&dyn ConnectionHandle> {
        let media = self.local_media.clone().unwrap_or_default();
        let connection = self
            .engine
            .create_connection(&media, self.engine_tx.clone())
            .await?;

        Ok(&**self.connection.insert(connection))
    }

    fn connection(&self) -> Result<&dyn ConnectionHandle> {
        self.connection
            .as_deref()
            .ok_or_else(|| PeerError::Negotiation("no connection for this room".to_owned()))
    }

    async fn send_to_room(&self, msg: &RoomMessage) -> Result<()> {
        let envelope = SignalEnvelope::to_room(self.room_id.clone(), msg)?;
        self.signaling.send_envelope(envelope).await
    }

    fn set_state(&self, state: NegotiationState) {
        debug!("Room {} negotiation state -> {}", self.room_id, state);
        self.state_tx.send_replace(state);
    }

    fn report(&self, error: PeerError) {
        match &error {
            PeerError::Candidate(_) | PeerError::Malformed(_) => {
                warn!("Room {}: {}", self.room_id, error)
            }
            _ => error!("Room {}: {}", self.room_id, error),
        }
        self.observer.on_failure(&error);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
