use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// User-selected chat configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub model: Option<String>,
    pub speaker_uuid: Option<String>,
    pub style_id: Option<u32>,
    pub prompt_id: Option<String>,
}

/// Synchronous read of the current chat configuration
pub trait SettingsSource: Send + Sync {
    fn chat_settings(&self) -> ChatSettings;
}

/// Synchronous read of the active conversation
pub trait RoomSource: Send + Sync {
    fn current_room(&self) -> Option<String>;
}

/// Partial update; unset fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub speaker_uuid: Option<String>,
    #[serde(default)]
    pub style_id: Option<u32>,
    #[serde(default)]
    pub prompt_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Settings plus room, as reported to clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    #[serde(flatten)]
    pub chat: ChatSettings,
    pub room_id: Option<String>,
}

/// Process-wide settings store shared by the pipeline and its controllers
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SettingsSnapshot>>,
}

impl SharedSettings {
    pub fn new(chat: ChatSettings, room_id: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SettingsSnapshot { chat, room_id })),
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn apply(&self, update: SettingsUpdate) -> SettingsSnapshot {
        let mut current = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(model) = update.model {
            current.chat.model = Some(model);
        }
        if let Some(speaker_uuid) = update.speaker_uuid {
            current.chat.speaker_uuid = Some(speaker_uuid);
        }
        if let Some(style_id) = update.style_id {
            current.chat.style_id = Some(style_id);
        }
        if let Some(prompt_id) = update.prompt_id {
            current.chat.prompt_id = Some(prompt_id);
        }
        if let Some(room_id) = update.room_id {
            current.room_id = Some(room_id);
        }

        current.clone()
    }

    pub fn set_prompt_id(&self, prompt_id: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .chat
            .prompt_id = Some(prompt_id.to_string());
    }
}

impl SettingsSource for SharedSettings {
    fn chat_settings(&self) -> ChatSettings {
        self.snapshot().chat
    }
}

impl RoomSource for SharedSettings {
    fn current_room(&self) -> Option<String> {
        self.snapshot().room_id.filter(|room| !room.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let settings = SharedSettings::new(
            ChatSettings {
                model: Some("models/llama.gguf".to_string()),
                speaker_uuid: Some("speaker-1".to_string()),
                style_id: Some(3),
                prompt_id: None,
            },
            None,
        );

        let snapshot = settings.apply(SettingsUpdate {
            style_id: Some(7),
            room_id: Some("room-1".to_string()),
            ..Default::default()
        });

        assert_eq!(snapshot.chat.model.as_deref(), Some("models/llama.gguf"));
        assert_eq!(snapshot.chat.style_id, Some(7));
        assert_eq!(settings.current_room().as_deref(), Some("room-1"));
    }

    #[test]
    fn test_empty_room_counts_as_missing() {
        let settings = SharedSettings::new(ChatSettings::default(), Some(String::new()));
        assert_eq!(settings.current_room(), None);
    }
}
