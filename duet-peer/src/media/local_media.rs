use duet_core::TrackKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A captured track. Clones share the same `enabled` flag.
#[derive(Debug, Clone)]
pub struct LocalTrack {
    id: String,
    kind: TrackKind,
    stream_id: String,
    enabled: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            stream_id: stream_id.into(),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }
}

/// The local stream handed to every connection the controller creates.
#[derive(Debug, Clone, Default)]
pub struct LocalMedia {
    tracks: Vec<LocalTrack>,
}

impl LocalMedia {
    pub fn new(tracks: Vec<LocalTrack>) -> Self {
        Self { tracks }
    }

    /// One audio and one video track sharing `stream_id`.
    pub fn audio_video(stream_id: &str) -> Self {
        Self::new(vec![
            LocalTrack::new(TrackKind::Audio, format!("{stream_id}-audio"), stream_id),
            LocalTrack::new(TrackKind::Video, format!("{stream_id}-video"), stream_id),
        ])
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn audio_track(&self) -> Option<&LocalTrack> {
        self.first_of(TrackKind::Audio)
    }

    pub fn video_track(&self) -> Option<&LocalTrack> {
        self.first_of(TrackKind::Video)
    }

    /// `None` when there is no audio track to mute.
    pub fn toggle_mic(&self) -> Option<bool> {
        self.audio_track().map(LocalTrack::toggle)
    }

    pub fn toggle_camera(&self) -> Option<bool> {
        self.video_track().map(LocalTrack::toggle)
    }

    fn first_of(&self, kind: TrackKind) -> Option<&LocalTrack> {
        self.tracks.iter().find(|track| track.kind() == kind)
    }
}
