//! Chat backend contract and its HTTP client

mod client;
mod error;
pub mod messages;

pub use client::{
    HttpChatBackend, COMPLETIONS_PATH, MESSAGES_PATH, PROMPT_LIST_PATH, REFINE_QUERY_PATH,
    TRANSCRIBE_PATH,
};
pub use error::BackendError;
pub use messages::{
    ChatMessage, CompletionRequest, PersistMessageRequest, PromptListResponse, PromptRecord,
    RefineQueryRequest, RefineQueryResponse, StoredMessage, TranscriptionResponse,
};

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Raw body chunks of a streaming completion, in arrival order
pub type ChunkStream = BoxStream<'static, Result<Vec<u8>, BackendError>>;

/// Backend calls made by one reply turn
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask for a refined query; `None` when the backend has no refinement
    async fn refine_query(&self, request: &RefineQueryRequest)
        -> Result<Option<String>, BackendError>;

    /// Start a streaming completion
    ///
    /// Non-success statuses fail here, before any chunk is read.
    async fn open_completion(&self, request: &CompletionRequest)
        -> Result<ChunkStream, BackendError>;

    /// Store the finished assistant message
    async fn persist_message(&self, request: &PersistMessageRequest) -> Result<(), BackendError>;
}
