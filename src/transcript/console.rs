use std::collections::HashMap;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use super::{MessageHandle, Role, Transcript};

/// Prints the conversation to stdout
///
/// Updates that extend the previous text print only the new suffix, so a
/// streaming reply reads like a typewriter.
#[derive(Debug, Default)]
pub struct ConsoleTranscript {
    shown: Mutex<HashMap<String, String>>,
}

impl ConsoleTranscript {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transcript for ConsoleTranscript {
    fn create(&self, role: Role, label: Option<&str>, text: &str) -> MessageHandle {
        let handle = MessageHandle::generate();

        match label {
            Some(label) => println!("\n{} ({})> {}", role.as_str(), label, text),
            None => println!("\n{}> {}", role.as_str(), text),
        }

        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.id().to_string(), text.to_string());

        handle
    }

    fn update(&self, handle: &MessageHandle, text: &str) {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = shown.entry(handle.id().to_string()).or_default();

        match text.strip_prefix(previous.as_str()) {
            Some(suffix) => print!("{}", suffix),
            None => print!("\n{}", text.trim_start()),
        }
        std::io::stdout().flush().ok();

        *previous = text.to_string();
    }
}
