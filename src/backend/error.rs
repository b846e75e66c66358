use thiserror::Error;

/// Failure talking to the chat backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("backend returned status {0}")]
    Status(u16),

    /// Connection, body or decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local file could not be read for upload
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Status code, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status(code) => Some(*code),
            BackendError::Transport(e) => e.status().map(|s| s.as_u16()),
            BackendError::Io(_) => None,
        }
    }
}
