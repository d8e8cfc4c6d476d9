//! In-memory element and fetcher used by the engine tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::element::{MediaElement, TrackId};
use super::fetcher::ResourceFetcher;
use super::object_url::{Blob, ObjectUrl};
use crate::error::{PlayerError, PlayerResult, ResourceKind};

pub struct FakeElement {
    pub source: Option<ObjectUrl>,
    pub blob: Option<Blob>,
    pub current_time: f64,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub reject_play: bool,
    tracks: Vec<TrackId>,
    tracks_ready: bool,
}

impl FakeElement {
    pub fn new() -> Self {
        Self {
            source: None,
            blob: None,
            current_time: 0.0,
            play_calls: 0,
            pause_calls: 0,
            reject_play: false,
            tracks: Vec::new(),
            tracks_ready: true,
        }
    }

    pub fn set_tracks_ready(&mut self, ready: bool) {
        self.tracks_ready = ready;
    }

    pub fn text_tracks(&self) -> Vec<TrackId> {
        self.tracks.clone()
    }
}

#[async_trait]
impl MediaElement for FakeElement {
    fn load(&mut self, source: &ObjectUrl, blob: Blob) -> PlayerResult<()> {
        self.source = Some(source.clone());
        self.blob = Some(blob);
        self.current_time = 0.0;
        Ok(())
    }

    fn unload(&mut self) {
        self.source = None;
        self.blob = None;
    }

    async fn play(&mut self) -> PlayerResult<()> {
        self.play_calls += 1;
        if self.reject_play {
            return Err(PlayerError::PlaybackRejected("autoplay blocked".to_string()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
    }

    fn set_current_time(&mut self, position: f64) {
        self.current_time = position;
    }

    fn add_text_track(&mut self, track: TrackId) {
        self.tracks.push(track);
    }

    fn remove_text_track(&mut self, track: TrackId) {
        self.tracks.retain(|t| *t != track);
    }

    fn has_text_track(&self, track: TrackId) -> bool {
        self.tracks_ready && self.tracks.contains(&track)
    }
}

/// Serves canned payloads keyed by locator; unknown locators fail.
#[derive(Default)]
pub struct FakeFetcher {
    payloads: Mutex<HashMap<String, Bytes>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, locator: &str, payload: &'static [u8]) -> Self {
        self.payloads
            .lock()
            .unwrap()
            .insert(locator.to_string(), Bytes::from_static(payload));
        self
    }

    fn get(&self, kind: ResourceKind, locator: &str) -> PlayerResult<Bytes> {
        self.requests.lock().unwrap().push(locator.to_string());
        self.payloads
            .lock()
            .unwrap()
            .get(locator)
            .cloned()
            .ok_or_else(|| PlayerError::unavailable(kind, "404 Not Found"))
    }
}

#[async_trait]
impl ResourceFetcher for FakeFetcher {
    async fn fetch_audio(&self, locator: &str) -> PlayerResult<Bytes> {
        self.get(ResourceKind::Audio, locator)
    }

    async fn fetch_captions(&self, locator: &str) -> PlayerResult<Bytes> {
        self.get(ResourceKind::Captions, locator)
    }
}
