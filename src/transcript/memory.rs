use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

use super::{MessageHandle, Role, Transcript};

/// A single rendered message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Message id (see [`MessageHandle`])
    pub id: String,

    /// Who wrote the message
    pub role: Role,

    /// Display label (model name for assistant messages)
    pub label: Option<String>,

    /// Current text, replaced on every update
    pub text: String,

    /// When the message was first rendered
    pub created_at: DateTime<Utc>,
}

/// In-memory transcript, append-only by message
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    entries: Mutex<Vec<TranscriptEntry>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message in creation order
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current state of one message
    pub fn get(&self, handle: &MessageHandle) -> Option<TranscriptEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|entry| entry.id == handle.id())
            .cloned()
    }
}

impl Transcript for MemoryTranscript {
    fn create(&self, role: Role, label: Option<&str>, text: &str) -> MessageHandle {
        let handle = MessageHandle::generate();
        let entry = TranscriptEntry {
            id: handle.id().to_string(),
            role,
            label: label.map(str::to_string),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);

        handle
    }

    fn update(&self, handle: &MessageHandle, text: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.iter_mut().find(|entry| entry.id == handle.id()) {
            Some(entry) => entry.text = text.to_string(),
            None => warn!("Update for unknown message {}", handle.id()),
        }
    }
}
