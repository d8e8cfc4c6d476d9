//! Podcast records as served by the listing endpoint

use serde::Deserialize;

/// Generation status. The service may introduce new values, which are kept
/// verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodcastStatus {
    Pending,
    Ready,
    Failed,
    Other(String),
}

impl From<String> for PodcastStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" | "processing" => PodcastStatus::Pending,
            "ready" => PodcastStatus::Ready,
            "failed" | "error" => PodcastStatus::Failed,
            _ => PodcastStatus::Other(raw),
        }
    }
}

impl PodcastStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PodcastStatus::Pending => "pending",
            PodcastStatus::Ready => "ready",
            PodcastStatus::Failed => "failed",
            PodcastStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PodcastStatus::Ready | PodcastStatus::Failed)
    }
}

/// Raw listing entry: `{ "id", "prompt", "status" }`
#[derive(Clone, Debug, Deserialize)]
pub struct PodcastRecord {
    pub id: String,
    pub prompt: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "PodcastRecord")]
pub struct Podcast {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: PodcastStatus,
}

impl From<PodcastRecord> for Podcast {
    fn from(record: PodcastRecord) -> Self {
        let description = format!("Status: {}", record.status);
        Self {
            id: record.id,
            title: record.prompt,
            description,
            status: PodcastStatus::from(record.status),
        }
    }
}

impl Podcast {
    pub fn is_ready(&self) -> bool {
        self.status == PodcastStatus::Ready
    }

    pub fn audio_locator(&self) -> String {
        format!("/podcast/stream-audio/{}", self.id)
    }

    pub fn caption_locator(&self) -> String {
        format!("/podcast/get-subtitle/{}", self.id)
    }

    pub fn cover_locator(&self) -> String {
        format!("/podcast/get-cover/{}", self.id)
    }
}
