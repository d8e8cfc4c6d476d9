//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Main layout structure (top bar, podcast list, details)
//! - `progress`: Progress bar rendering
//! - `overlays`: Error notification, caption overlay, help popup

mod utils;
mod layout;
mod progress;
mod overlays;

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{Podcast, UiState};
use crate::player::PlaybackState;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        playback: &PlaybackState,
        ui_state: &UiState,
        podcasts: &[Podcast],
        last_refreshed: Option<DateTime<Local>>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Topic input + status
                Constraint::Min(0),    // Podcast list + details
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, last_refreshed);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45), // Podcast list
                Constraint::Percentage(55), // Details and captions
            ])
            .split(chunks[1]);

        let now_playing = playback.podcast_id.as_deref();
        layout::render_podcast_list(frame, main_chunks[0], ui_state, podcasts, now_playing);
        layout::render_details(frame, main_chunks[1], podcasts.get(ui_state.podcast_selected));

        if let Some(text) = playback.active_caption.as_deref() {
            overlays::render_caption_overlay(frame, main_chunks[1], text, playback.caption_exiting);
        }

        let title = now_playing
            .and_then(|id| podcasts.iter().find(|p| p.id == id))
            .map(|p| p.title.as_str());
        progress::render_progress_bar(frame, chunks[2], playback, title);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
