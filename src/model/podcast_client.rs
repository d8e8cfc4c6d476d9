//! Content-service client: podcast listing, generation requests and the
//! authenticated audio/caption downloads the player consumes

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Serialize;

use super::podcast::Podcast;
use crate::auth::AuthToken;
use crate::error::{PlayerError, PlayerResult, ResourceKind};
use crate::player::ResourceFetcher;
use crate::{log_fetch_request, log_fetch_result};

const LISTING_PATH: &str = "/podcast/user-podcasts";
const GENERATE_PATH: &str = "/ai/generate-podcast";

/// Languages the generation endpoint accepts
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "es", "pt"];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    content: &'a str,
    language: &'a str,
}

#[derive(Clone)]
pub struct PodcastClient {
    http: Client,
    base_url: Url,
    token: AuthToken,
    request_timeout: Duration,
}

impl PodcastClient {
    pub fn new(base_url: &str, token: AuthToken, request_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token,
            request_timeout,
        })
    }

    fn url(&self, locator: &str) -> Result<Url> {
        self.base_url
            .join(locator)
            .with_context(|| format!("Invalid locator {}", locator))
    }

    pub async fn list_podcasts(&self) -> Result<Vec<Podcast>> {
        log_fetch_request!("list_podcasts", path = LISTING_PATH);
        let url = self.url(LISTING_PATH)?;

        let result = async {
            let podcasts = self
                .http
                .get(url)
                .bearer_auth(self.token.bearer())
                .timeout(self.request_timeout)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Podcast>>()
                .await?;
            Ok::<_, reqwest::Error>(podcasts)
        }
        .await;

        log_fetch_result!("list_podcasts", result);
        let podcasts = result.context("Failed to fetch podcast listing")?;
        tracing::info!(count = podcasts.len(), "Podcast listing refreshed");
        Ok(podcasts)
    }

    /// Ask the service to generate a podcast. Completion is not tracked;
    /// the new entry shows up on a later listing refresh.
    pub async fn generate_podcast(&self, topic: &str, language: &str) -> Result<()> {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            anyhow::bail!("Unsupported language '{}', expected one of {:?}", language, SUPPORTED_LANGUAGES);
        }

        log_fetch_request!("generate_podcast", language, topic_len = topic.len());
        let url = self.url(GENERATE_PATH)?;

        let result = async {
            self.http
                .post(url)
                .bearer_auth(self.token.bearer())
                .timeout(self.request_timeout)
                .json(&GenerateRequest { content: topic, language })
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, reqwest::Error>(())
        }
        .await;

        log_fetch_result!("generate_podcast", result);
        result.context("Failed to start podcast generation")
    }

    async fn download(&self, kind: ResourceKind, locator: &str, accept: &str) -> PlayerResult<Bytes> {
        log_fetch_request!("download", %kind, locator);
        let url = self
            .url(locator)
            .map_err(|e| PlayerError::unavailable(kind, format!("{:#}", e)))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.bearer())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| PlayerError::unavailable(kind, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let err = PlayerError::unavailable(kind, format!("HTTP {} for {}", status.as_u16(), locator));
            tracing::error!(%kind, locator, status = status.as_u16(), "Download rejected");
            return Err(err);
        }

        let mut body = BytesMut::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| PlayerError::unavailable(kind, e.to_string()))?
        {
            body.extend_from_slice(&chunk);
            tracing::trace!(%kind, received = body.len(), "Download progress");
        }

        tracing::info!(%kind, locator, size = body.len(), "Download complete");
        Ok(body.freeze())
    }
}

#[async_trait]
impl ResourceFetcher for PodcastClient {
    async fn fetch_audio(&self, locator: &str) -> PlayerResult<Bytes> {
        self.download(ResourceKind::Audio, locator, "audio/*").await
    }

    async fn fetch_captions(&self, locator: &str) -> PlayerResult<Bytes> {
        self.download(ResourceKind::Captions, locator, "text/vtt").await
    }
}
