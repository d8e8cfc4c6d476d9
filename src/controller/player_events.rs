//! Media element event listener

use tokio::sync::mpsc;

use crate::player::{MediaEvent, PlaybackStatus};
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(&self, mut events: mpsc::UnboundedReceiver<MediaEvent>) {
        let model = self.model.clone();
        let player = self.player.clone();
        tracing::info!("Starting media event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if model.lock().await.should_quit().await {
                    tracing::debug!("Media event listener shutting down");
                    break;
                }

                match &event {
                    MediaEvent::TimeUpdate { position, .. } => tracing::trace!(position, "MediaEvent::TimeUpdate"),
                    MediaEvent::LoadedMetadata { duration, .. } => {
                        tracing::debug!(duration, "MediaEvent::LoadedMetadata")
                    }
                    MediaEvent::Ended { .. } => tracing::debug!("MediaEvent::Ended"),
                    MediaEvent::Error { message, .. } => tracing::warn!(message = %message, "MediaEvent::Error"),
                }

                let failure = {
                    let mut player = player.lock().await;
                    let before = player.status();
                    player.handle_event(event);
                    if before != PlaybackStatus::Error && player.status() == PlaybackStatus::Error {
                        player.snapshot().error
                    } else {
                        None
                    }
                };

                if let Some(message) = failure {
                    model.lock().await.set_error(format!("Playback error: {}", message)).await;
                }
            }
        });
    }
}
