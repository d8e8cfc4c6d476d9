//! Error taxonomy for the playback engine
//!
//! Fatal and non-fatal failures are distinguished by variant, not by
//! the call site: audio `ResourceUnavailable`, `Media` and `PlaybackRejected`
//! end up in front of the user, `CaptionUnavailable` only ever reaches the log.

use std::fmt;

pub type PlayerResult<T> = Result<T, PlayerError>;

/// Which resource a fetch was for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Audio,
    Captions,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Audio => write!(f, "audio"),
            ResourceKind::Captions => write!(f, "captions"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlayerError {
    /// A fetch failed (transport, non-success status, authorization, timeout).
    #[error("{kind} unavailable: {reason}")]
    ResourceUnavailable { kind: ResourceKind, reason: String },

    /// The element refused to start playback.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// No usable caption track for this selection.
    #[error("captions unavailable: {0}")]
    CaptionUnavailable(String),

    /// The element could not load or decode the bound source.
    #[error("media error: {0}")]
    Media(String),
}

impl PlayerError {
    pub fn unavailable(kind: ResourceKind, reason: impl Into<String>) -> Self {
        PlayerError::ResourceUnavailable {
            kind,
            reason: reason.into(),
        }
    }

    pub fn timeout(kind: ResourceKind) -> Self {
        Self::unavailable(kind, "timeout")
    }

    /// Whether this error ends the current selection.
    pub fn is_fatal(&self) -> bool {
        match self {
            PlayerError::ResourceUnavailable { kind, .. } => *kind == ResourceKind::Audio,
            PlayerError::PlaybackRejected(_) | PlayerError::Media(_) => true,
            PlayerError::CaptionUnavailable(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_failures_are_not_fatal() {
        assert!(!PlayerError::unavailable(ResourceKind::Captions, "404").is_fatal());
        assert!(!PlayerError::CaptionUnavailable("empty".into()).is_fatal());
        assert!(PlayerError::unavailable(ResourceKind::Audio, "404").is_fatal());
        assert!(PlayerError::PlaybackRejected("blocked".into()).is_fatal());
    }

    #[test]
    fn test_display_names_the_resource() {
        let err = PlayerError::timeout(ResourceKind::Audio);
        assert_eq!(err.to_string(), "audio unavailable: timeout");
    }
}
