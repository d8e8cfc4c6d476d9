//! Playback state machine
//!
//! `Idle -> Loading -> (Playing <-> Paused)`, with any state able to fall into
//! `Error` and a new selection leading back to `Loading`. Every external
//! happening maps to exactly one method here; nothing else touches the
//! element, the track handle or the published blobs.
//!
//! Selection is split into `begin_select` / `complete_audio` /
//! `complete_captions` / `verify_captions` so a driver can await the network
//! without holding the controller. Completions carry a [`LoadTicket`]; one
//! that no longer matches the current selection is dropped on the floor.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::Mutex;

use super::captions::{CaptionTrackController, TrackHandle, TrackMode};
use super::element::{MediaElement, MediaEvent};
use super::fetcher::{self, ResourceFetcher};
use super::object_url::{Blob, ObjectUrl, ObjectUrlManager};
use super::state::{known_duration, PlaybackState, PlaybackStatus};
use crate::error::{PlayerError, PlayerResult, ResourceKind};
use crate::model::Podcast;

/// The content service always serves WAV.
const AUDIO_MIME: &str = "audio/wav";
const CAPTION_MIME: &str = "text/vtt";

#[derive(Clone, Debug)]
pub struct PlayerSettings {
    pub fetch_timeout: Duration,
    pub caption_verify_grace: Duration,
    pub caption_exit: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            caption_verify_grace: Duration::from_millis(1000),
            caption_exit: Duration::from_millis(300),
        }
    }
}

/// Identifies one selection. Issued by `begin_select`.
#[derive(Clone, Debug)]
pub struct LoadTicket {
    generation: u64,
    pub podcast_id: String,
    pub audio_locator: String,
    pub caption_locator: String,
}

/// Outcome of a caption attach step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionAttach {
    Ready,
    /// The element has not confirmed the track; call `verify_captions`
    /// again after the grace period.
    NeedsVerification,
    Unavailable,
}

pub struct PlaybackController<E: MediaElement> {
    element: E,
    urls: ObjectUrlManager,
    captions: CaptionTrackController,
    settings: PlayerSettings,
    generation: u64,
    podcast_id: Option<String>,
    audio_url: Option<ObjectUrl>,
    track: Option<TrackHandle>,
    status: PlaybackStatus,
    position: f64,
    duration: Option<f64>,
    captions_enabled: bool,
    active_caption: Option<String>,
    caption_exit_started: Option<Instant>,
    error: Option<PlayerError>,
}

impl<E: MediaElement> PlaybackController<E> {
    pub fn new(element: E, settings: PlayerSettings) -> Self {
        Self {
            element,
            urls: ObjectUrlManager::new(),
            captions: CaptionTrackController::new(),
            settings,
            generation: 0,
            podcast_id: None,
            audio_url: None,
            track: None,
            status: PlaybackStatus::Idle,
            position: 0.0,
            duration: None,
            captions_enabled: true,
            active_caption: None,
            caption_exit_started: None,
            error: None,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    #[cfg(test)]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Number of blob references currently published by this player.
    #[cfg(test)]
    pub fn live_references(&self) -> usize {
        self.urls.live_count()
    }

    pub fn snapshot(&self) -> PlaybackState {
        let caption_exiting = !self.captions_enabled && self.caption_exit_pending();
        let active_caption = if self.captions_enabled || caption_exiting {
            self.active_caption.clone()
        } else {
            None
        };

        PlaybackState {
            podcast_id: self.podcast_id.clone(),
            status: self.status,
            position: self.position,
            duration: self.duration,
            captions_enabled: self.captions_enabled,
            captions_available: self.captions.is_available(),
            active_caption,
            caption_exiting,
            error: self.error.as_ref().map(ToString::to_string),
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Run a whole selection against `fetcher`: audio, then captions with
    /// the two-phase attach check. The lock is only held between steps, so
    /// the player stays responsive while downloading and a newer selection
    /// turns this one stale. Ends in `Loading` until the element reports
    /// metadata, or in `Error` if the audio could not be bound.
    pub async fn select<F: ResourceFetcher>(player: &Mutex<Self>, fetcher: &F, podcast: &Podcast) -> PlayerResult<()> {
        let (ticket, settings) = {
            let mut player = player.lock().await;
            (player.begin_select(podcast), player.settings.clone())
        };

        let audio = fetcher::with_timeout(
            ResourceKind::Audio,
            settings.fetch_timeout,
            fetcher.fetch_audio(&ticket.audio_locator),
        )
        .await;
        if !player.lock().await.complete_audio(&ticket, audio)? {
            return Ok(());
        }

        let captions = fetcher::with_timeout(
            ResourceKind::Captions,
            settings.fetch_timeout,
            fetcher.fetch_captions(&ticket.caption_locator),
        )
        .await;
        let attach = player.lock().await.complete_captions(&ticket, captions);
        if attach == CaptionAttach::NeedsVerification {
            tokio::time::sleep(settings.caption_verify_grace).await;
            let verified = player.lock().await.verify_captions(&ticket);
            tracing::debug!(podcast_id = %ticket.podcast_id, ?verified, "Caption re-verification finished");
        }
        Ok(())
    }

    /// Release whatever is bound and start loading `podcast`.
    pub fn begin_select(&mut self, podcast: &Podcast) -> LoadTicket {
        self.release_resources();

        self.generation += 1;
        self.podcast_id = Some(podcast.id.clone());
        self.status = PlaybackStatus::Loading;
        self.position = 0.0;
        self.duration = None;
        self.active_caption = None;
        self.caption_exit_started = None;
        self.error = None;

        tracing::info!(podcast_id = %podcast.id, generation = self.generation, "Loading podcast");

        LoadTicket {
            generation: self.generation,
            podcast_id: podcast.id.clone(),
            audio_locator: podcast.audio_locator(),
            caption_locator: podcast.caption_locator(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.podcast_id.as_deref() == Some(ticket.podcast_id.as_str())
    }

    /// Apply the audio fetch result. `Ok(false)` means the ticket was stale
    /// and the payload was discarded.
    pub fn complete_audio(&mut self, ticket: &LoadTicket, result: PlayerResult<Bytes>) -> PlayerResult<bool> {
        if !self.is_current(ticket) {
            tracing::debug!(podcast_id = %ticket.podcast_id, "Discarding stale audio completion");
            return Ok(false);
        }

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                self.fail(e.clone());
                return Err(e);
            }
        };

        let blob = Blob {
            bytes: bytes.clone(),
            mime_type: AUDIO_MIME.to_string(),
        };
        let url = self.urls.publish(bytes, AUDIO_MIME);

        if let Err(e) = self.element.load(&url, blob) {
            self.urls.revoke(&url);
            self.fail(e.clone());
            return Err(e);
        }

        tracing::info!(podcast_id = %ticket.podcast_id, url = %url, "Audio bound to element");
        self.audio_url = Some(url);
        Ok(true)
    }

    /// Apply the caption fetch result. Never fails the selection.
    pub fn complete_captions(&mut self, ticket: &LoadTicket, result: PlayerResult<Bytes>) -> CaptionAttach {
        if !self.is_current(ticket) {
            tracing::debug!(podcast_id = %ticket.podcast_id, "Discarding stale caption completion");
            return CaptionAttach::Unavailable;
        }
        if self.audio_url.is_none() {
            return CaptionAttach::Unavailable;
        }

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(podcast_id = %ticket.podcast_id, error = %e, "Continuing without captions");
                return CaptionAttach::Unavailable;
            }
        };

        let url = self.urls.publish(bytes.clone(), CAPTION_MIME);
        match self.captions.attach(&mut self.element, url.clone(), &bytes) {
            Ok(handle) => {
                if !self.captions_enabled {
                    self.captions.set_mode(&handle, TrackMode::Hidden);
                }
                self.track = Some(handle);
                if self.captions.verify(&self.element) {
                    self.resync_caption();
                    CaptionAttach::Ready
                } else {
                    tracing::debug!(podcast_id = %ticket.podcast_id, "Caption track not wired yet, will re-verify");
                    CaptionAttach::NeedsVerification
                }
            }
            Err(e) => {
                self.urls.revoke(&url);
                tracing::warn!(podcast_id = %ticket.podcast_id, error = %e, "Continuing without captions");
                CaptionAttach::Unavailable
            }
        }
    }

    /// Second and last verification of a pending caption track.
    pub fn verify_captions(&mut self, ticket: &LoadTicket) -> CaptionAttach {
        if !self.is_current(ticket) || self.track.is_none() {
            return CaptionAttach::Unavailable;
        }

        if self.captions.verify(&self.element) {
            self.resync_caption();
            return CaptionAttach::Ready;
        }

        let err = PlayerError::CaptionUnavailable("track was never wired to the element".to_string());
        tracing::warn!(podcast_id = %ticket.podcast_id, error = %err, "Continuing without captions");
        self.release_captions();
        CaptionAttach::Unavailable
    }

    // ========================================================================
    // Element events
    // ========================================================================

    /// Route an element event to its transition. Events for a source that
    /// is no longer bound are ignored.
    pub fn handle_event(&mut self, event: MediaEvent) {
        if self.audio_url.as_ref() != Some(event.source()) {
            tracing::trace!(source = %event.source(), "Ignoring event for unbound source");
            return;
        }

        match event {
            MediaEvent::LoadedMetadata { duration, .. } => self.on_metadata(duration),
            MediaEvent::TimeUpdate { position, duration, .. } => self.tick(position, duration),
            MediaEvent::Ended { .. } => self.on_ended(),
            MediaEvent::Error { message, .. } => self.on_media_error(message),
        }
    }

    pub fn on_metadata(&mut self, duration: f64) {
        self.duration = known_duration(duration);
        if self.status == PlaybackStatus::Loading {
            self.status = PlaybackStatus::Paused;
            self.position = 0.0;
            tracing::info!(duration = ?self.duration, "Metadata loaded, ready to play");
        }
    }

    pub fn tick(&mut self, position: f64, duration: f64) {
        if let Some(duration) = known_duration(duration) {
            self.duration = Some(duration);
        }
        if position.is_finite() {
            self.position = position.max(0.0);
        }

        if let Some(change) = self.captions.on_time_update(self.position) {
            if self.captions_enabled {
                self.active_caption = change.text;
            }
        }

        if !self.captions_enabled && self.caption_exit_started.is_some() && !self.caption_exit_pending() {
            self.active_caption = None;
            self.caption_exit_started = None;
        }
    }

    pub fn on_ended(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
        if let Some(duration) = self.duration {
            self.position = duration;
        }
        tracing::debug!(position = self.position, "Playback reached end of track");
    }

    pub fn on_media_error(&mut self, message: String) {
        self.fail(PlayerError::Media(message));
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Flip between playing and paused. A refused play reverts to `Paused`
    /// and is returned as `PlaybackRejected`.
    pub async fn toggle_play_pause(&mut self) -> PlayerResult<()> {
        match self.status {
            PlaybackStatus::Playing => {
                self.element.pause();
                self.status = PlaybackStatus::Paused;
                tracing::info!(position = self.position, "Paused");
                Ok(())
            }
            PlaybackStatus::Paused => {
                if self.duration.is_some_and(|d| self.position >= d) {
                    self.element.set_current_time(0.0);
                    self.position = 0.0;
                    self.resync_caption();
                }

                self.status = PlaybackStatus::Playing;
                match self.element.play().await {
                    Ok(()) => {
                        tracing::info!(position = self.position, "Playing");
                        Ok(())
                    }
                    Err(e) => {
                        let err = match e {
                            PlayerError::PlaybackRejected(_) => e,
                            other => PlayerError::PlaybackRejected(other.to_string()),
                        };
                        tracing::error!(error = %err, "Play request failed");
                        self.status = PlaybackStatus::Paused;
                        self.error = Some(err.clone());
                        Err(err)
                    }
                }
            }
            status => {
                tracing::debug!(?status, "Ignoring play/pause outside of a loaded track");
                Ok(())
            }
        }
    }

    /// Jump to `position`, clamped to the track. Returns the applied position.
    pub fn seek(&mut self, position: f64) -> f64 {
        if !matches!(self.status, PlaybackStatus::Playing | PlaybackStatus::Paused) {
            return self.position;
        }

        let upper = self.duration.unwrap_or(f64::INFINITY);
        let target = if position.is_nan() { 0.0 } else { position.clamp(0.0, upper) };

        self.element.set_current_time(target);
        self.position = target;
        self.resync_caption();

        tracing::debug!(requested = position, applied = target, "Seek");
        target
    }

    /// Show or hide captions. Errors when there is no usable track so the
    /// caller can say so instead of silently ignoring the request.
    pub fn toggle_captions(&mut self) -> PlayerResult<bool> {
        let handle = match (&self.track, self.captions.is_available()) {
            (Some(handle), true) => handle.clone(),
            _ => {
                return Err(PlayerError::CaptionUnavailable("no caption track for this podcast".to_string()));
            }
        };

        self.captions_enabled = !self.captions_enabled;
        if self.captions_enabled {
            self.captions.set_mode(&handle, TrackMode::Showing);
            self.caption_exit_started = None;
            self.active_caption = self.captions.resync(self.position);
        } else {
            // Last caption stays up for the exit transition
            self.captions.set_mode(&handle, TrackMode::Hidden);
            self.caption_exit_started = Some(Instant::now());
        }

        tracing::debug!(enabled = self.captions_enabled, "Captions toggled");
        Ok(self.captions_enabled)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Release everything and return to `Idle`. In-flight completions for
    /// the previous selection become stale.
    pub fn teardown(&mut self) {
        self.release_resources();
        self.generation += 1;
        self.podcast_id = None;
        self.status = PlaybackStatus::Idle;
        self.position = 0.0;
        self.duration = None;
        self.active_caption = None;
        self.caption_exit_started = None;
        self.error = None;
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn fail(&mut self, err: PlayerError) {
        tracing::error!(podcast_id = ?self.podcast_id, error = %err, "Playback failed");
        self.release_resources();
        self.status = PlaybackStatus::Error;
        self.error = Some(err);
    }

    fn resync_caption(&mut self) {
        if self.captions_enabled {
            self.active_caption = self.captions.resync(self.position);
        }
    }

    fn caption_exit_pending(&self) -> bool {
        self.caption_exit_started
            .is_some_and(|started| started.elapsed() < self.settings.caption_exit)
    }

    fn release_captions(&mut self) {
        self.captions.detach(&mut self.element);
        if let Some(handle) = self.track.take() {
            self.urls.revoke(&handle.source);
        }
        self.active_caption = None;
    }

    /// Unbind before revoking: a reference is never revoked while the
    /// element may still read it.
    fn release_resources(&mut self) {
        self.release_captions();
        if let Some(url) = self.audio_url.take() {
            self.element.unload();
            self.urls.revoke(&url);
        }
        debug_assert_eq!(self.urls.live_count(), 0);
    }
}

impl<E: MediaElement> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.release_resources();
    }
}
