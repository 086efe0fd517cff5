use duet_core::TrackKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: TrackKind,
    pub stream_id: String,
}

/// Renderable collection of the tracks the other participant sends.
///
/// Bound to the first inbound stream: tracks of any other stream are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteStream {
    stream_id: Option<String>,
    tracks: Vec<RemoteTrack>,
}

impl RemoteStream {
    /// Returns `false` if the track is already present or belongs to another stream.
    pub fn add_track(&mut self, track: RemoteTrack) -> bool {
        match &self.stream_id {
            Some(id) if *id != track.stream_id => return false,
            Some(_) => {}
            None => self.stream_id = Some(track.stream_id.clone()),
        }
        if self.tracks.iter().any(|t| t.id == track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.stream_id.as_deref()
    }

    pub fn tracks(&self) -> &[RemoteTrack] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
