//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use super::podcast::Podcast;
use super::types::{InputMode, UiState};

/// Notices fade on their own; errors stay until dismissed.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Main application model containing all non-playback state
pub struct AppModel {
    podcasts: Arc<Mutex<Vec<Podcast>>>,
    last_refreshed: Arc<Mutex<Option<DateTime<Local>>>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            podcasts: Arc::new(Mutex::new(Vec::new())),
            last_refreshed: Arc::new(Mutex::new(None)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Podcast listing
    // ========================================================================

    /// Replace the listing, keeping the selection on the same podcast when it
    /// is still present.
    pub async fn set_podcasts(&self, podcasts: Vec<Podcast>) {
        let mut list = self.podcasts.lock().await;
        let mut state = self.ui_state.lock().await;

        let selected_id = list.get(state.podcast_selected).map(|p| p.id.clone());
        state.podcast_selected = selected_id
            .and_then(|id| podcasts.iter().position(|p| p.id == id))
            .unwrap_or(0)
            .min(podcasts.len().saturating_sub(1));

        *list = podcasts;
        *self.last_refreshed.lock().await = Some(Local::now());
    }

    pub async fn get_podcasts(&self) -> Vec<Podcast> {
        self.podcasts.lock().await.clone()
    }

    pub async fn get_selected_podcast(&self) -> Option<Podcast> {
        let list = self.podcasts.lock().await;
        let state = self.ui_state.lock().await;
        list.get(state.podcast_selected).cloned()
    }

    pub async fn last_refreshed(&self) -> Option<DateTime<Local>> {
        *self.last_refreshed.lock().await
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        if state.podcast_selected > 0 {
            state.podcast_selected -= 1;
        }
    }

    pub async fn move_selection_down(&self) {
        let len = self.podcasts.lock().await.len();
        let mut state = self.ui_state.lock().await;
        if state.podcast_selected < len.saturating_sub(1) {
            state.podcast_selected += 1;
        }
    }

    // ========================================================================
    // Topic input
    // ========================================================================

    pub async fn begin_topic_input(&self) {
        let mut state = self.ui_state.lock().await;
        state.input_mode = InputMode::Topic;
        state.topic_input.clear();
    }

    pub async fn cancel_topic_input(&self) {
        let mut state = self.ui_state.lock().await;
        state.input_mode = InputMode::Browse;
        state.topic_input.clear();
    }

    pub async fn input_mode(&self) -> InputMode {
        self.ui_state.lock().await.input_mode
    }

    pub async fn append_to_topic(&self, c: char) {
        self.ui_state.lock().await.topic_input.push(c);
    }

    pub async fn backspace_topic(&self) {
        self.ui_state.lock().await.topic_input.pop();
    }

    /// Leave topic input, returning the trimmed topic if there is one.
    pub async fn take_topic(&self) -> Option<String> {
        let mut state = self.ui_state.lock().await;
        state.input_mode = InputMode::Browse;
        let topic = std::mem::take(&mut state.topic_input);
        let topic = topic.trim();
        (!topic.is_empty()).then(|| topic.to_string())
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn set_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn auto_clear_old_notices(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.notice_timestamp {
            if timestamp.elapsed() > NOTICE_TTL {
                state.notice = None;
                state.notice_timestamp = None;
            }
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::podcast::PodcastRecord;

    fn podcast(id: &str, status: &str) -> Podcast {
        PodcastRecord {
            id: id.to_string(),
            prompt: format!("About {}", id),
            status: status.to_string(),
        }
        .into()
    }

    #[tokio::test]
    async fn test_selection_follows_podcast_across_refresh() {
        let model = AppModel::new();
        model.set_podcasts(vec![podcast("a", "ready"), podcast("b", "ready")]).await;
        model.move_selection_down().await;
        assert_eq!(model.get_selected_podcast().await.map(|p| p.id), Some("b".to_string()));

        model
            .set_podcasts(vec![podcast("c", "pending"), podcast("a", "ready"), podcast("b", "ready")])
            .await;
        assert_eq!(model.get_selected_podcast().await.map(|p| p.id), Some("b".to_string()));
        assert!(model.last_refreshed().await.is_some());
    }

    #[tokio::test]
    async fn test_selection_is_clamped() {
        let model = AppModel::new();
        model.move_selection_down().await;
        assert!(model.get_selected_podcast().await.is_none());

        model.set_podcasts(vec![podcast("a", "ready")]).await;
        model.move_selection_down().await;
        model.move_selection_up().await;
        model.move_selection_up().await;
        assert_eq!(model.get_ui_state().await.podcast_selected, 0);
    }

    #[tokio::test]
    async fn test_topic_input_trims_and_resets_mode() {
        let model = AppModel::new();
        model.begin_topic_input().await;
        assert_eq!(model.input_mode().await, InputMode::Topic);
        for c in "  rust ".chars() {
            model.append_to_topic(c).await;
        }
        model.append_to_topic('x').await;
        model.backspace_topic().await;
        assert_eq!(model.take_topic().await, Some("rust".to_string()));
        assert_eq!(model.input_mode().await, InputMode::Browse);

        model.begin_topic_input().await;
        model.append_to_topic(' ').await;
        assert_eq!(model.take_topic().await, None);
    }

    #[tokio::test]
    async fn test_errors_persist_until_cleared() {
        let model = AppModel::new();
        model.set_error("boom".to_string()).await;
        model.auto_clear_old_notices().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }
}
