//! Model module - Application state and data types
//!
//! - `types`: UI state definitions
//! - `podcast`: podcast records as served by the content service
//! - `podcast_client`: content-service HTTP client
//! - `app_model`: Main application model with state management methods

mod types;
mod podcast;
mod podcast_client;
mod app_model;

pub use types::{InputMode, UiState};

pub use podcast::{Podcast, PodcastStatus};

pub use podcast_client::PodcastClient;

pub use app_model::AppModel;
