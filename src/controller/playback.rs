//! Podcast selection, playback control and listing operations

use crate::error::PlayerError;
use crate::model::Podcast;
use crate::player::PlaybackStatus;

use super::{AppController, Player};

impl AppController {
    /// Load the podcast under the cursor.
    pub async fn play_selected(&self) {
        let selected = self.model.lock().await.get_selected_podcast().await;
        if let Some(podcast) = selected {
            self.select_podcast(podcast).await;
        }
    }

    /// Fetch and bind a podcast's audio, then its captions. Runs in the
    /// background; a newer selection made meanwhile supersedes this one.
    pub async fn select_podcast(&self, podcast: Podcast) {
        if !podcast.is_ready() {
            tracing::info!(podcast_id = %podcast.id, status = podcast.status.as_str(), "Refusing non-ready podcast");
            self.model.lock().await.set_error("Podcast not ready".to_string()).await;
            return;
        }

        if let Err(e) = Player::select(&self.player, &self.client, &podcast).await {
            self.report_player_error(&e).await;
        }
    }

    pub async fn toggle_playback(&self) {
        let result = self.player.lock().await.toggle_play_pause().await;
        if let Err(e) = result {
            self.report_player_error(&e).await;
        }
    }

    pub async fn seek_forward(&self) {
        self.seek_by(self.seek_step).await;
    }

    pub async fn seek_backward(&self) {
        self.seek_by(-self.seek_step).await;
    }

    async fn seek_by(&self, delta: f64) {
        let mut player = self.player.lock().await;
        let position = player.snapshot().position;
        player.seek(position + delta);
    }

    pub async fn toggle_captions(&self) {
        let result = self.player.lock().await.toggle_captions();
        let model = self.model.lock().await;
        match result {
            Ok(true) => model.set_notice("Captions on".to_string()).await,
            Ok(false) => model.set_notice("Captions off".to_string()).await,
            Err(e) => {
                tracing::debug!(error = %e, "Caption toggle without a track");
                model.set_notice(Self::format_player_error(&e)).await;
            }
        }
    }

    pub async fn refresh_podcasts(&self) {
        match self.client.list_podcasts().await {
            Ok(podcasts) => {
                self.model.lock().await.set_podcasts(podcasts).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Podcast refresh failed");
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Request generation for `topic`, then refresh so the pending entry shows.
    pub async fn generate_podcast(&self, topic: String) {
        tracing::info!(topic = %topic, language = %self.language, "Requesting podcast generation");
        match self.client.generate_podcast(&topic, &self.language).await {
            Ok(()) => {
                let model = self.model.lock().await;
                model.set_notice(format!("Generating \"{}\", refresh with r", topic)).await;
                drop(model);
                self.refresh_podcasts().await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Clear the notification along with the error the player is holding.
    pub async fn dismiss_error(&self) {
        self.model.lock().await.clear_error().await;
        self.player.lock().await.dismiss_error();
    }

    /// Stop playback and release every published reference.
    pub async fn shutdown_player(&self) {
        let mut player = self.player.lock().await;
        if player.status() != PlaybackStatus::Idle {
            tracing::info!("Releasing player resources");
        }
        player.teardown();
    }

    pub(crate) async fn report_player_error(&self, error: &PlayerError) {
        if !error.is_fatal() {
            tracing::debug!(error = %error, "Non-fatal player error");
            return;
        }
        let model = self.model.lock().await;
        model.set_error(Self::format_player_error(error)).await;
    }
}
