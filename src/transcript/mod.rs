//! Conversation transcript (rendering surface)
//!
//! The reply pipeline never touches a concrete UI. It talks to a
//! [`Transcript`], which creates messages and hands back a [`MessageHandle`]
//! that later updates are addressed to:
//! - `MemoryTranscript` keeps entries in memory (control API, tests)
//! - `ConsoleTranscript` prints to stdout (CLI)

mod console;
mod memory;

pub use console::ConsoleTranscript;
pub use memory::{MemoryTranscript, TranscriptEntry};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Identity of one rendered message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    id: String,
}

impl MessageHandle {
    /// Generate a fresh id: `msg-<unix millis>-<random tie-breaker>`
    ///
    /// Unique in practice, not guaranteed.
    pub fn generate() -> Self {
        let tie_breaker = uuid::Uuid::new_v4().as_u128() % 1_000_000;
        Self {
            id: format!("msg-{}-{}", Utc::now().timestamp_millis(), tie_breaker),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Rendering capability used by the reply pipeline
pub trait Transcript: Send + Sync {
    /// Append a message and return the handle used to update it
    fn create(&self, role: Role, label: Option<&str>, text: &str) -> MessageHandle;

    /// Replace the text of an existing message
    fn update(&self, handle: &MessageHandle, text: &str);
}
