//! Playback state exposed to the presentation layer

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Error,
}

/// Read-only snapshot of the player
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub podcast_id: Option<String>,
    pub status: PlaybackStatus,
    pub position: f64,
    /// `None` until the element reports a usable duration
    pub duration: Option<f64>,
    pub captions_enabled: bool,
    pub captions_available: bool,
    pub active_caption: Option<String>,
    /// Set while the caption is on its way out after captions were turned off
    pub caption_exiting: bool,
    pub error: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            podcast_id: None,
            status: PlaybackStatus::Idle,
            position: 0.0,
            duration: None,
            captions_enabled: true,
            captions_available: false,
            active_caption: None,
            caption_exiting: false,
            error: None,
        }
    }
}

impl PlaybackState {
    /// Progress in `[0, 1]`, zero while the duration is unknown.
    pub fn progress_ratio(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.position / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Interpret an element-reported duration: `NaN`, infinite and negative
/// values mean the duration is not known yet.
pub fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration >= 0.0).then_some(duration)
}
