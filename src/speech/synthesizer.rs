use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SpeechSynthesizer;

/// Body of the synthesis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub speaker_uuid: String,
    pub style_id: u32,
}

/// Synthesis result: one locator per spoken segment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Synthesizer backed by the chat backend's audio endpoint
#[derive(Debug, Clone)]
pub struct HttpSpeechSynthesizer {
    client: Client,
    base_url: String,
    path: String,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: &str, path: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.to_string(),
        }
    }

    /// Make a locator playable from outside the backend's own pages
    pub fn resolve_locator(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else if locator.starts_with('/') {
            format!("{}{}", self.base_url, locator)
        } else {
            format!("{}/{}", self.base_url, locator)
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        speaker_uuid: &str,
        style_id: u32,
    ) -> Result<Vec<String>> {
        let request = SynthesisRequest {
            text: text.to_string(),
            speaker_uuid: speaker_uuid.to_string(),
            style_id,
        };

        let response: SynthesisResponse = self
            .client
            .post(format!("{}{}", self.base_url, self.path))
            .json(&request)
            .send()
            .await
            .context("Failed to send synthesis request")?
            .error_for_status()
            .context("Synthesis request rejected")?
            .json()
            .await
            .context("Failed to decode synthesis response")?;

        info!("Synthesized {} clip(s) for {} chars", response.urls.len(), text.chars().count());

        Ok(response
            .urls
            .iter()
            .map(|url| self.resolve_locator(url))
            .collect())
    }
}
