//! The playback element seam
//!
//! Whatever actually produces sound implements [`MediaElement`]. Asynchronous
//! happenings on the element side (metadata known, position advanced, end of
//! stream, decode failure) come back as [`MediaEvent`]s tagged with the
//! source they belong to, so events from a replaced source can be dropped.

use async_trait::async_trait;

use super::object_url::{Blob, ObjectUrl};
use crate::error::PlayerResult;

/// Identifies a text track registered on an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(pub(crate) u64);

#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    /// Duration is `NaN` when the container does not declare it.
    LoadedMetadata { source: ObjectUrl, duration: f64 },
    TimeUpdate { source: ObjectUrl, position: f64, duration: f64 },
    Ended { source: ObjectUrl },
    Error { source: ObjectUrl, message: String },
}

impl MediaEvent {
    pub fn source(&self) -> &ObjectUrl {
        match self {
            MediaEvent::LoadedMetadata { source, .. }
            | MediaEvent::TimeUpdate { source, .. }
            | MediaEvent::Ended { source }
            | MediaEvent::Error { source, .. } => source,
        }
    }
}

#[async_trait]
pub trait MediaElement: Send {
    /// Bind a new source, replacing any previous one. Metadata is reported
    /// later through [`MediaEvent::LoadedMetadata`].
    fn load(&mut self, source: &ObjectUrl, blob: Blob) -> PlayerResult<()>;

    /// Drop the bound source and stop output.
    fn unload(&mut self);

    /// Start or resume output. May be refused by the platform.
    async fn play(&mut self) -> PlayerResult<()>;

    fn pause(&mut self);

    fn set_current_time(&mut self, position: f64);

    fn add_text_track(&mut self, track: TrackId);

    fn remove_text_track(&mut self, track: TrackId);

    /// Whether the element has finished wiring up `track`.
    fn has_text_track(&self, track: TrackId) -> bool;
}
