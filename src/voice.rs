//! Voice input: recorded audio is transcribed, then submitted like typed text

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{BackendError, TranscriptionResponse};
use crate::pipeline::{ReplyPipeline, TurnError, TurnOutcome};
use crate::transcript::{Role, Transcript};

/// Speech-to-text service
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, path: &Path) -> Result<TranscriptionResponse, BackendError>;
}

#[derive(Debug, Error)]
pub enum VoiceError {
    /// The service answered without text
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The upload did not go through
    #[error("transcription upload failed: {0}")]
    Connection(#[source] BackendError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Record → upload → submit
pub struct VoiceInput {
    transcriber: Arc<dyn Transcriber>,
    pipeline: Arc<ReplyPipeline>,
    transcript: Arc<dyn Transcript>,
}

impl VoiceInput {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        pipeline: Arc<ReplyPipeline>,
        transcript: Arc<dyn Transcript>,
    ) -> Self {
        Self {
            transcriber,
            pipeline,
            transcript,
        }
    }

    /// Transcribe the recording at `path` and run a turn with the result
    pub async fn submit_recording(&self, path: &Path) -> Result<TurnOutcome, VoiceError> {
        info!("Transcribing {}", path.display());

        let response = match self.transcriber.transcribe(path).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Transcription upload failed: {}", e);
                self.transcript.create(
                    Role::Assistant,
                    None,
                    &format!("[connection error]: {}", e),
                );
                return Err(VoiceError::Connection(e));
            }
        };

        match response.text.filter(|text| !text.trim().is_empty()) {
            Some(text) => Ok(self.pipeline.submit(&text).await?),
            None => {
                let reason = response
                    .error
                    .unwrap_or_else(|| "unknown error".to_string());
                warn!("Transcription returned no text: {}", reason);
                self.transcript.create(
                    Role::Assistant,
                    None,
                    &format!("[transcription error]: {}", reason),
                );
                Err(VoiceError::Transcription(reason))
            }
        }
    }
}
