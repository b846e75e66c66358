use serde::{Deserialize, Serialize};

use crate::transcript::Role;

/// Body of `POST /v1/chat/refine_query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineQueryRequest {
    pub role: Role,
    pub content: String,
    pub model: String,
}

/// Response of `POST /v1/chat/refine_query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefineQueryResponse {
    #[serde(default)]
    pub refined_query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /v1/chat/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub prompt_id: String,
    pub room_id: String,
}

/// Assistant message as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
    pub model: String,
    pub speaker_uuid: String,
    pub style_id: u32,
}

/// Body of `POST /v1/chat/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistMessageRequest {
    pub room_id: String,
    pub message: StoredMessage,
}

/// One entry of `GET /v1/chat/prompt/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /v1/chat/prompt/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<PromptRecord>>,
}

/// Response of `POST /v1/audio/transcribe`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
