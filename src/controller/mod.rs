//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model, the player and the view.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Podcast selection, playback and listing operations
//! - `player_events`: Media element event listener

mod input;
mod playback;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::RodioElement;
use crate::error::PlayerError;
use crate::model::{AppModel, PodcastClient};
use crate::player::PlaybackController;

pub type Player = PlaybackController<RodioElement>;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: Arc<Mutex<Player>>,
    client: PodcastClient,
    seek_step: f64,
    language: String,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        player: Arc<Mutex<Player>>,
        client: PodcastClient,
        seek_step: f64,
        language: String,
    ) -> Self {
        Self {
            model,
            player,
            client,
            seek_step,
            language,
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(player_error) = error.downcast_ref::<PlayerError>() {
            return Self::format_player_error(player_error);
        }

        let error_str = format!("{:#}", error);
        if error_str.contains("401") {
            "Session expired. Log in again and save the new token.".to_string()
        } else if error_str.contains("403") {
            "Access denied by the content service.".to_string()
        } else if error_str.contains("422") || error_str.contains("400") {
            "The content service rejected the request.".to_string()
        } else if error_str.contains("error sending request") || error_str.contains("Connection refused") {
            "Content service unreachable. Check api_base_url.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }

    pub(crate) fn format_player_error(error: &PlayerError) -> String {
        match error {
            PlayerError::ResourceUnavailable { kind, reason } if reason == "timeout" => {
                format!("Timed out downloading {}.", kind)
            }
            PlayerError::ResourceUnavailable { kind, reason } => {
                format!("Could not load {}: {}", kind, reason)
            }
            PlayerError::PlaybackRejected(reason) => format!("Playback refused: {}", reason),
            PlayerError::CaptionUnavailable(_) => "Captions are not available for this podcast.".to_string(),
            PlayerError::Media(reason) => format!("Playback error: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceKind;

    #[test]
    fn test_format_player_errors() {
        let timeout = anyhow::Error::new(PlayerError::timeout(ResourceKind::Audio));
        assert_eq!(AppController::format_error(&timeout), "Timed out downloading audio.");

        let missing = PlayerError::unavailable(ResourceKind::Audio, "HTTP 404 for /x");
        assert_eq!(AppController::format_player_error(&missing), "Could not load audio: HTTP 404 for /x");

        let rejected = PlayerError::PlaybackRejected("no audio output device".to_string());
        assert_eq!(
            AppController::format_player_error(&rejected),
            "Playback refused: no audio output device"
        );
    }

    #[test]
    fn test_format_http_errors() {
        let unauthorized = anyhow::anyhow!("HTTP status client error (401 Unauthorized)");
        assert!(AppController::format_error(&unauthorized).starts_with("Session expired"));

        let other = anyhow::anyhow!("something odd").context("Failed to fetch podcast listing");
        assert_eq!(
            AppController::format_error(&other),
            "Error: Failed to fetch podcast listing: something odd"
        );
    }
}
