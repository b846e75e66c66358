//! System prompt selection

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::backend::{HttpChatBackend, PromptListResponse};

/// Prompt used when none is selected or listed
pub const DEFAULT_PROMPT_ID: &str = "rag_default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub name: String,
}

/// Turn a prompt-list response into prompts; unknown shapes give nothing
pub fn prompts_from_response(response: PromptListResponse) -> Vec<Prompt> {
    match response.data {
        Some(records) if response.success => records
            .into_iter()
            .map(|record| Prompt {
                name: record
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| record.id.clone()),
                id: record.id,
            })
            .collect(),
        _ => {
            warn!("Unexpected prompt list format (success={})", response.success);
            Vec::new()
        }
    }
}

/// Fetch available prompts; failures yield an empty list
pub async fn fetch_prompts(backend: &HttpChatBackend) -> Vec<Prompt> {
    match backend.prompt_list().await {
        Ok(response) => prompts_from_response(response),
        Err(e) => {
            error!("Failed to fetch prompt list: {}", e);
            Vec::new()
        }
    }
}

/// Keep the saved prompt if it is still offered, else fall back
pub fn resolve_prompt_id(saved: Option<&str>, prompts: &[Prompt]) -> String {
    if let Some(saved) = saved {
        if prompts.iter().any(|prompt| prompt.id == saved) {
            return saved.to_string();
        }
    }

    prompts
        .first()
        .map(|prompt| prompt.id.clone())
        .unwrap_or_else(|| DEFAULT_PROMPT_ID.to_string())
}
