//! Core type definitions for the application

use std::time::Instant;

/// What keystrokes currently go to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    /// Typing a topic for a new podcast
    Topic,
}

/// UI state for the application
#[derive(Clone, Default)]
pub struct UiState {
    pub input_mode: InputMode,
    pub topic_input: String,
    pub podcast_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}
