//! Caption track lifecycle and cue tracking
//!
//! At most one track is attached to the element at a time. The element may
//! not have wired a freshly added track up yet, so attachment is confirmed
//! with [`CaptionTrackController::verify`] before any cue is reported.

use super::element::{MediaElement, TrackId};
use super::object_url::ObjectUrl;
use super::webvtt::{self, Cue};
use crate::error::PlayerResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackMode {
    Showing,
    Hidden,
}

/// Handle to the attached track, owned by the playback controller
#[derive(Clone, Debug, PartialEq)]
pub struct TrackHandle {
    pub id: TrackId,
    pub source: ObjectUrl,
}

/// Pushed when the active cue changes during playback
#[derive(Clone, Debug, PartialEq)]
pub struct CueChange {
    pub text: Option<String>,
}

struct AttachedTrack {
    handle: TrackHandle,
    cues: Vec<Cue>,
    mode: TrackMode,
    verified: bool,
    /// Index of the last cue reported through `on_time_update`/`resync`
    last_active: Option<usize>,
}

#[derive(Default)]
pub struct CaptionTrackController {
    track: Option<AttachedTrack>,
    next_id: u64,
}

impl CaptionTrackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `payload` and register it on `element`, replacing any previous
    /// track. The returned handle is not usable until verified.
    pub fn attach<E: MediaElement>(
        &mut self,
        element: &mut E,
        source: ObjectUrl,
        payload: &[u8],
    ) -> PlayerResult<TrackHandle> {
        if let Some(previous) = self.detach(element) {
            tracing::debug!(source = %previous.source, "Replaced previous caption track");
        }

        let cues = webvtt::parse(payload)?;

        self.next_id += 1;
        let handle = TrackHandle {
            id: TrackId(self.next_id),
            source,
        };
        element.add_text_track(handle.id);

        tracing::info!(track = ?handle.id, cues = cues.len(), "Caption track attached");

        // Hidden tracks do not surface cue changes, so start showing.
        self.track = Some(AttachedTrack {
            handle: handle.clone(),
            cues,
            mode: TrackMode::Showing,
            verified: false,
            last_active: None,
        });
        Ok(handle)
    }

    /// Check that the element reports the track as wired up.
    pub fn verify<E: MediaElement>(&mut self, element: &E) -> bool {
        match self.track.as_mut() {
            Some(track) => {
                track.verified = element.has_text_track(track.handle.id);
                track.verified
            }
            None => false,
        }
    }

    /// Remove the attached track from `element`, returning its handle.
    pub fn detach<E: MediaElement>(&mut self, element: &mut E) -> Option<TrackHandle> {
        let track = self.track.take()?;
        element.remove_text_track(track.handle.id);
        Some(track.handle)
    }

    pub fn is_available(&self) -> bool {
        self.track.as_ref().is_some_and(|t| t.verified)
    }

    #[cfg(test)]
    pub fn mode(&self, handle: &TrackHandle) -> Option<TrackMode> {
        self.current(handle).map(|t| t.mode)
    }

    pub fn set_mode(&mut self, handle: &TrackHandle, mode: TrackMode) {
        if let Some(track) = self.track.as_mut().filter(|t| t.handle == *handle) {
            tracing::debug!(track = ?handle.id, ?mode, "Caption track mode changed");
            track.mode = mode;
            if mode == TrackMode::Hidden {
                track.last_active = None;
            }
        }
    }

    /// First cue in track order that covers `position`.
    #[cfg(test)]
    pub fn active_cue(&self, handle: &TrackHandle, position: f64) -> Option<&Cue> {
        let track = self.current(handle)?;
        track.cues.iter().find(|c| c.is_active_at(position))
    }

    /// Push path: report a change of active cue since the last report.
    /// Silent while the track is hidden or unverified.
    pub fn on_time_update(&mut self, position: f64) -> Option<CueChange> {
        let track = self.track.as_mut().filter(|t| t.verified && t.mode == TrackMode::Showing)?;
        let active = Self::active_index(&track.cues, position);
        if active == track.last_active {
            return None;
        }
        track.last_active = active;
        Some(CueChange {
            text: active.map(|i| track.cues[i].text.clone()),
        })
    }

    /// Pull path: recompute the active cue unconditionally, e.g. after a seek
    /// where no ordered cue notifications can be relied on.
    pub fn resync(&mut self, position: f64) -> Option<String> {
        let track = self.track.as_mut().filter(|t| t.verified && t.mode == TrackMode::Showing)?;
        track.last_active = Self::active_index(&track.cues, position);
        track.last_active.map(|i| track.cues[i].text.clone())
    }

    #[cfg(test)]
    fn current(&self, handle: &TrackHandle) -> Option<&AttachedTrack> {
        self.track.as_ref().filter(|t| t.handle == *handle)
    }

    fn active_index(cues: &[Cue], position: f64) -> Option<usize> {
        cues.iter().position(|c| c.is_active_at(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::FakeElement;
    use crate::player::object_url::ObjectUrlManager;
    use bytes::Bytes;

    const TWO_CUES: &[u8] =
        b"WEBVTT\n\n00:00:00.000 --> 00:00:02.000\na\n\n00:00:02.000 --> 00:00:05.000\nb\n";

    fn attached() -> (CaptionTrackController, FakeElement, TrackHandle) {
        let mut element = FakeElement::new();
        let mut controller = CaptionTrackController::new();
        let source = ObjectUrlManager::new().publish(Bytes::from_static(TWO_CUES), "text/vtt");
        let handle = controller.attach(&mut element, source, TWO_CUES).unwrap();
        assert!(controller.verify(&element));
        (controller, element, handle)
    }

    #[test]
    fn test_active_cue_lookup() {
        let (controller, _element, handle) = attached();

        assert_eq!(controller.active_cue(&handle, 1.0).map(|c| c.text.as_str()), Some("a"));
        assert_eq!(controller.active_cue(&handle, 2.0).map(|c| c.text.as_str()), Some("b"));
        assert_eq!(controller.active_cue(&handle, 6.0), None);
    }

    #[test]
    fn test_attach_replaces_previous_track() {
        let (mut controller, mut element, first) = attached();
        let source = ObjectUrlManager::new().publish(Bytes::from_static(TWO_CUES), "text/vtt");
        let second = controller.attach(&mut element, source, TWO_CUES).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(element.text_tracks(), vec![second.id]);
        assert_eq!(controller.active_cue(&first, 1.0), None);
        assert_eq!(controller.mode(&second), Some(TrackMode::Showing));
    }

    #[test]
    fn test_time_updates_only_push_changes() {
        let (mut controller, _element, _handle) = attached();

        assert_eq!(controller.on_time_update(0.5), Some(CueChange { text: Some("a".into()) }));
        assert_eq!(controller.on_time_update(1.5), None);
        assert_eq!(controller.on_time_update(2.5), Some(CueChange { text: Some("b".into()) }));
        assert_eq!(controller.on_time_update(7.0), Some(CueChange { text: None }));
        assert_eq!(controller.on_time_update(8.0), None);
    }

    #[test]
    fn test_hidden_track_is_silent() {
        let (mut controller, _element, handle) = attached();
        controller.set_mode(&handle, TrackMode::Hidden);

        assert_eq!(controller.on_time_update(1.0), None);
        assert_eq!(controller.resync(1.0), None);

        controller.set_mode(&handle, TrackMode::Showing);
        assert_eq!(controller.resync(1.0), Some("a".to_string()));
    }

    #[test]
    fn test_unverified_track_is_unavailable() {
        let mut element = FakeElement::new();
        element.set_tracks_ready(false);
        let mut controller = CaptionTrackController::new();
        let source = ObjectUrlManager::new().publish(Bytes::from_static(TWO_CUES), "text/vtt");
        controller.attach(&mut element, source, TWO_CUES).unwrap();

        assert!(!controller.verify(&element));
        assert!(!controller.is_available());
        assert_eq!(controller.on_time_update(1.0), None);
    }

    #[test]
    fn test_bad_payload_attaches_nothing() {
        let mut element = FakeElement::new();
        let mut controller = CaptionTrackController::new();
        let source = ObjectUrlManager::new().publish(Bytes::from_static(b"garbage"), "text/vtt");

        assert!(controller.attach(&mut element, source, b"garbage").is_err());
        assert!(element.text_tracks().is_empty());
        assert!(!controller.is_available());
    }
}
