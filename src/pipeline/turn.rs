use super::settings::ChatSettings;
use super::state::TurnError;
use crate::backend::{
    ChatMessage, CompletionRequest, PersistMessageRequest, RefineQueryRequest, StoredMessage,
};
use crate::prompts::DEFAULT_PROMPT_ID;
use crate::transcript::Role;

/// Immutable inputs of one reply turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    pub text: String,
    pub model: String,
    pub speaker_uuid: String,
    pub style_id: u32,
    pub room_id: String,
    pub prompt_id: String,
}

impl TurnContext {
    /// Check room and settings for a submission of `text`
    pub fn resolve(
        text: &str,
        settings: &ChatSettings,
        room_id: Option<String>,
    ) -> Result<Self, TurnError> {
        let room_id = room_id.ok_or(TurnError::NoRoom)?;

        let model = settings.model.clone().filter(|m| !m.is_empty());
        let speaker_uuid = settings.speaker_uuid.clone().filter(|s| !s.is_empty());

        let (Some(model), Some(speaker_uuid), Some(style_id)) =
            (model, speaker_uuid, settings.style_id)
        else {
            return Err(TurnError::Configuration(missing_fields(settings)));
        };

        let prompt_id = settings
            .prompt_id
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PROMPT_ID.to_string());

        Ok(Self {
            text: text.to_string(),
            model,
            speaker_uuid,
            style_id,
            room_id,
            prompt_id,
        })
    }

    pub fn refine_request(&self) -> RefineQueryRequest {
        RefineQueryRequest {
            role: Role::User,
            content: self.text.clone(),
            model: self.model.clone(),
        }
    }

    pub fn completion_request(&self, query: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: query.to_string(),
            }],
            stream: true,
            prompt_id: self.prompt_id.clone(),
            room_id: self.room_id.clone(),
        }
    }

    pub fn persist_request(&self, reply: &str) -> PersistMessageRequest {
        PersistMessageRequest {
            room_id: self.room_id.clone(),
            message: StoredMessage {
                role: Role::Assistant,
                content: reply.to_string(),
                model: self.model.clone(),
                speaker_uuid: self.speaker_uuid.clone(),
                style_id: self.style_id,
            },
        }
    }
}

fn missing_fields(settings: &ChatSettings) -> String {
    let mut missing = Vec::new();
    if settings.model.as_deref().map_or(true, str::is_empty) {
        missing.push("model");
    }
    if settings.speaker_uuid.as_deref().map_or(true, str::is_empty) {
        missing.push("speaker");
    }
    if settings.style_id.is_none() {
        missing.push("style");
    }
    missing.join(", ")
}

/// Model label shown above a reply: file name without `.gguf`
pub fn display_model_name(model: &str) -> String {
    let file_name = model.rsplit('/').next().unwrap_or(model);
    file_name
        .strip_suffix(".gguf")
        .unwrap_or(file_name)
        .to_string()
}
