use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::pipeline::ChatSettings;

/// Environment variables override file values: `VOICE_CHAT__CHAT__MODEL=...`
pub const ENV_PREFIX: &str = "VOICE_CHAT";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "voice-chat".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Chat backend root, e.g. `http://localhost:8000`
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Initial chat selection; every field may be changed at runtime
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatConfig {
    pub model: Option<String>,
    pub speaker_uuid: Option<String>,
    pub style_id: Option<u32>,
    pub prompt_id: Option<String>,
    pub room_id: Option<String>,
}

impl ChatConfig {
    pub fn settings(&self) -> ChatSettings {
        ChatSettings {
            model: self.model.clone(),
            speaker_uuid: self.speaker_uuid.clone(),
            style_id: self.style_id,
            prompt_id: self.prompt_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Synthesis endpoint, relative to `backend.base_url`
    pub synthesize_path: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            synthesize_path: "/v1/audio/synthesize".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackConfig {
    /// External player program; clips are only logged when unset
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Minimum time between two redraws of a streaming reply
    pub frame_interval_ms: u64,
}

impl RenderConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
        }
    }
}

impl Config {
    /// Load `path` (extension optional, file optional) plus environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}
