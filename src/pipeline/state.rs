use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;

/// Where the reply pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    Refining,
    AwaitingStream,
    Streaming,
    Synthesizing,
    Persisting,
    /// The last turn ended early; the pipeline accepts new turns
    Failed,
}

impl TurnState {
    /// A turn is running
    pub fn is_active(&self) -> bool {
        !matches!(self, TurnState::Idle | TurnState::Failed)
    }
}

/// Result of a completed turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Id of the assistant message in the transcript
    pub message_id: String,

    /// Final assistant text
    pub text: String,

    /// Frames skipped because they could not be parsed
    pub skipped_frames: usize,

    /// Number of synthesized clips
    pub clips: usize,

    /// Number of clips that played to the end
    pub clips_ended: usize,

    /// Whether the backend stored the message
    pub persisted: bool,
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("nothing to send")]
    EmptyInput,

    #[error("a turn is already in progress")]
    Busy,

    #[error("no active room")]
    NoRoom,

    #[error("configuration incomplete: missing {0}")]
    Configuration(String),

    #[error("completion request failed: {0}")]
    Completion(#[source] BackendError),

    #[error("completion stream broke off: {0}")]
    Stream(#[source] BackendError),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] anyhow::Error),
}
