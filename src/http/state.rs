use crate::backend::HttpChatBackend;
use crate::pipeline::{ReplyPipeline, SharedSettings};
use crate::transcript::MemoryTranscript;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Reply pipeline (one turn at a time)
    pub pipeline: Arc<ReplyPipeline>,

    /// Transcript the pipeline renders into
    pub transcript: Arc<MemoryTranscript>,

    /// Chat selection and active room
    pub settings: SharedSettings,

    /// Backend used for the prompt list
    pub backend: Arc<HttpChatBackend>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<ReplyPipeline>,
        transcript: Arc<MemoryTranscript>,
        settings: SharedSettings,
        backend: Arc<HttpChatBackend>,
    ) -> Self {
        Self {
            pipeline,
            transcript,
            settings,
            backend,
        }
    }
}
