//! Reply pipeline
//!
//! One user turn moves through these stages, strictly in order:
//! - query refinement (best-effort)
//! - streaming completion, rendered as it arrives
//! - speech synthesis and sequential clip playback
//! - persistence of the final reply

mod reply;
mod settings;
mod state;
mod turn;

pub use reply::{
    completion_error_message, PipelineParts, ReplyPipeline, CONFIGURATION_ERROR_MESSAGE,
    GENERATING_PLACEHOLDER,
};
pub use settings::{
    ChatSettings, RoomSource, SettingsSnapshot, SettingsSource, SettingsUpdate, SharedSettings,
};
pub use state::{TurnError, TurnOutcome, TurnState};
pub use turn::{display_model_name, TurnContext};
