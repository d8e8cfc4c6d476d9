//! Revocable in-memory blob references
//!
//! A published buffer is addressable through an [`ObjectUrl`] until it is
//! revoked. The element resolves the reference when a source is bound, so
//! revoking only drops the registry's handle; the element keeps whatever it
//! already decoded.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

const URL_PREFIX: &str = "blob:podcast-player/";

/// Process-local reference to a published [`Blob`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    fn mint() -> Self {
        Self(format!("{}{}", URL_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable payload plus its MIME type
#[derive(Clone, Debug)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime_type: String,
}

/// Registry of live blob references for one player instance
#[derive(Default)]
pub struct ObjectUrlManager {
    entries: HashMap<ObjectUrl, Blob>,
}

impl ObjectUrlManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, bytes: Bytes, mime_type: &str) -> ObjectUrl {
        let url = ObjectUrl::mint();
        tracing::debug!(url = %url, mime_type, size = bytes.len(), "Published object URL");
        self.entries.insert(
            url.clone(),
            Blob {
                bytes,
                mime_type: mime_type.to_string(),
            },
        );
        url
    }

    /// Release a reference. Unknown or already-revoked references are ignored.
    pub fn revoke(&mut self, url: &ObjectUrl) {
        if self.entries.remove(url).is_some() {
            tracing::debug!(url = %url, "Revoked object URL");
        }
    }

    pub fn resolve(&self, url: &ObjectUrl) -> Option<Blob> {
        self.entries.get(url).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_mints_distinct_references() {
        let mut manager = ObjectUrlManager::new();
        let a = manager.publish(Bytes::from_static(b"a"), "audio/wav");
        let b = manager.publish(Bytes::from_static(b"b"), "audio/wav");

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("blob:"));
        assert_eq!(manager.live_count(), 2);
        assert_eq!(manager.resolve(&b).map(|blob| blob.bytes), Some(Bytes::from_static(b"b")));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let mut manager = ObjectUrlManager::new();
        let url = manager.publish(Bytes::from_static(b"data"), "text/vtt");

        manager.revoke(&url);
        manager.revoke(&url);

        assert_eq!(manager.live_count(), 0);
        assert!(manager.resolve(&url).is_none());
    }

    #[test]
    fn test_revoke_never_published_is_noop() {
        let mut manager = ObjectUrlManager::new();
        let kept = manager.publish(Bytes::from_static(b"data"), "audio/wav");
        let foreign = ObjectUrlManager::new().publish(Bytes::new(), "audio/wav");

        manager.revoke(&foreign);

        assert!(manager.resolve(&kept).is_some());
        assert_eq!(manager.live_count(), 1);
    }
}
