//! Resource fetching seam

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{PlayerError, PlayerResult, ResourceKind};

/// Retrieves raw payloads for a podcast. Implementations attach credentials
/// and must report failures as [`PlayerError::ResourceUnavailable`] with
/// the matching [`ResourceKind`].
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch_audio(&self, locator: &str) -> PlayerResult<Bytes>;

    async fn fetch_captions(&self, locator: &str) -> PlayerResult<Bytes>;
}

/// Bound a fetch so a hung request turns into a `ResourceUnavailable`.
pub async fn with_timeout<F>(kind: ResourceKind, timeout: Duration, fetch: F) -> PlayerResult<Bytes>
where
    F: Future<Output = PlayerResult<Bytes>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(%kind, timeout_ms = timeout.as_millis() as u64, "Fetch timed out");
            Err(PlayerError::timeout(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_maps_to_unavailable() {
        let hung = std::future::pending::<PlayerResult<Bytes>>();
        let result = with_timeout(ResourceKind::Captions, Duration::from_millis(10), hung).await;
        assert_eq!(result, Err(PlayerError::timeout(ResourceKind::Captions)));
    }

    #[tokio::test]
    async fn test_completed_fetch_passes_through() {
        let ready = async { Ok(Bytes::from_static(b"RIFF")) };
        let result = with_timeout(ResourceKind::Audio, Duration::from_secs(1), ready).await;
        assert_eq!(result, Ok(Bytes::from_static(b"RIFF")));
    }
}
