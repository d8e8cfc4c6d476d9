//! Player module - media playback and caption synchronization engine
//!
//! Organized leaves first:
//!
//! - `fetcher`: Resource fetching seam and fetch timeouts
//! - `object_url`: Revocable blob references for fetched payloads
//! - `webvtt`: Timed-text parsing
//! - `captions`: Caption track lifecycle and active-cue tracking
//! - `element`: The playback element seam and its events
//! - `state`: Snapshot types handed to the presentation layer
//! - `engine`: The playback state machine composing all of the above

mod fetcher;
mod object_url;
mod webvtt;
mod captions;
mod element;
mod state;
mod engine;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::ResourceFetcher;
pub use object_url::{Blob, ObjectUrl};
pub use element::{MediaElement, MediaEvent, TrackId};
pub use state::{PlaybackState, PlaybackStatus};
pub use engine::{PlaybackController, PlayerSettings};
