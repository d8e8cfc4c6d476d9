use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

/// Takes precedence over the token file
const TOKEN_ENV: &str = "PODCAST_PLAYER_TOKEN";

/// Bearer token issued by the content service's login flow
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Load the token saved by the login flow, from the environment or `token_file`.
pub fn load_token(token_file: &Path) -> Result<AuthToken> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if let Some(token) = normalize(&token) {
            tracing::info!("Using auth token from environment");
            return Ok(token);
        }
    }

    let raw = fs::read_to_string(token_file).with_context(|| {
        format!(
            "No auth token found. Log in through the web app and save the token to {} or set {}",
            token_file.display(),
            TOKEN_ENV
        )
    })?;

    let token = normalize(&raw).with_context(|| format!("Token file {} is empty", token_file.display()))?;
    tracing::info!(path = %token_file.display(), "Loaded auth token from disk");
    Ok(token)
}

/// Trim whitespace and an optional `Bearer ` prefix.
fn normalize(raw: &str) -> Option<AuthToken> {
    let trimmed = raw.trim();
    let token = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed).trim();
    (!token.is_empty()).then(|| AuthToken::new(token))
}
