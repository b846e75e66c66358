use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::path::Path;
use tracing::{debug, info};

use super::error::BackendError;
use super::messages::{
    CompletionRequest, PersistMessageRequest, PromptListResponse, RefineQueryRequest,
    RefineQueryResponse, TranscriptionResponse,
};
use super::{ChatBackend, ChunkStream};
use crate::voice::Transcriber;

pub const REFINE_QUERY_PATH: &str = "/v1/chat/refine_query";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const MESSAGES_PATH: &str = "/v1/chat/messages";
pub const PROMPT_LIST_PATH: &str = "/v1/chat/prompt/list";
pub const TRANSCRIBE_PATH: &str = "/v1/audio/transcribe";

/// HTTP client for the chat backend
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the raw prompt list
    pub async fn prompt_list(&self) -> Result<PromptListResponse, BackendError> {
        let response = self.client.get(self.url(PROMPT_LIST_PATH)).send().await?;
        let response = ensure_success(response)?;
        Ok(response.json().await?)
    }
}

fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status(status.as_u16()))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn refine_query(
        &self,
        request: &RefineQueryRequest,
    ) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .post(self.url(REFINE_QUERY_PATH))
            .json(request)
            .send()
            .await?;
        let body: RefineQueryResponse = ensure_success(response)?.json().await?;

        Ok(body.refined_query.filter(|query| !query.is_empty()))
    }

    async fn open_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, BackendError> {
        info!(
            "Requesting completion (model={}, room={}, prompt={})",
            request.model, request.room_id, request.prompt_id
        );

        let response = self
            .client
            .post(self.url(COMPLETIONS_PATH))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response)?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(BackendError::from))
            .boxed())
    }

    async fn persist_message(&self, request: &PersistMessageRequest) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(MESSAGES_PATH))
            .json(request)
            .send()
            .await?;
        ensure_success(response)?;

        debug!("Persisted assistant message for room {}", request.room_id);
        Ok(())
    }
}

#[async_trait]
impl Transcriber for HttpChatBackend {
    async fn transcribe(&self, path: &Path) -> Result<TranscriptionResponse, BackendError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recorded_audio.webm".to_string());

        info!("Uploading {} ({} bytes) for transcription", file_name, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        // Error bodies carry an `error` field, so the body is read regardless of status
        let response = self
            .client
            .post(self.url(TRANSCRIBE_PATH))
            .multipart(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}
