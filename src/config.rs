//! Application configuration
//!
//! Layered with figment: built-in defaults, then `podcast-player.toml` in the
//! working directory if present, then `PODCAST_PLAYER_*` environment
//! variables (e.g. `PODCAST_PLAYER_API_BASE_URL`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::player::PlayerSettings;

const CONFIG_FILE: &str = "podcast-player.toml";
const ENV_PREFIX: &str = "PODCAST_PLAYER_";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub api_base_url: String,
    pub token_file: PathBuf,
    pub fetch_timeout_secs: u64,
    pub caption_verify_grace_ms: u64,
    pub caption_exit_ms: u64,
    pub tick_interval_ms: u64,
    pub seek_step_secs: f64,
    /// Language requested for newly generated podcasts
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            token_file: PathBuf::from(".cache/auth_token"),
            fetch_timeout_secs: 30,
            caption_verify_grace_ms: 1000,
            caption_exit_ms: 300,
            tick_interval_ms: 250,
            seek_step_secs: 5.0,
            language: "en".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::figment()
            .extract()
            .context("Invalid configuration")
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["token"]))
    }

    pub fn player_settings(&self) -> PlayerSettings {
        PlayerSettings {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            caption_verify_grace: Duration::from_millis(self.caption_verify_grace_ms),
            caption_exit: Duration::from_millis(self.caption_exit_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_player_defaults() {
        let settings = Config::default().player_settings();
        let defaults = PlayerSettings::default();
        assert_eq!(settings.fetch_timeout, defaults.fetch_timeout);
        assert_eq!(settings.caption_verify_grace, defaults.caption_verify_grace);
        assert_eq!(settings.caption_exit, defaults.caption_exit);
    }

    #[test]
    fn test_env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PODCAST_PLAYER_API_BASE_URL", "https://pods.example.com");
            jail.set_env("PODCAST_PLAYER_FETCH_TIMEOUT_SECS", "5");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.api_base_url, "https://pods.example.com");
            assert_eq!(config.fetch_timeout_secs, 5);
            assert_eq!(config.caption_exit_ms, 300);
            Ok(())
        });
    }

    #[test]
    fn test_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "language = \"es\"\nseek_step_secs = 10.0\n")?;
            jail.set_env("PODCAST_PLAYER_LANGUAGE", "fr");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.language, "fr");
            assert_eq!(config.seek_step_secs, 10.0);
            Ok(())
        });
    }
}
