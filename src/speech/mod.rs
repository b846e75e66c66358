//! Speech synthesis and clip playback
//!
//! A finished reply is turned into an ordered list of audio locators by a
//! [`SpeechSynthesizer`], then played one clip at a time by an [`AudioPlayer`].

mod player;
mod synthesizer;

pub use player::{play_sequentially, AudioPlayerFactory, CommandPlayer, SilentPlayer};
pub use synthesizer::{HttpSpeechSynthesizer, SynthesisRequest, SynthesisResponse};

use anyhow::Result;

/// How a single clip finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Played to the end
    Ended,
    /// Could not be played; still counts as done
    Error(String),
}

/// Speech synthesis backend
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text`, returning playable locators in speaking order
    async fn synthesize(&self, text: &str, speaker_uuid: &str, style_id: u32)
        -> Result<Vec<String>>;
}

/// Audio output
#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play one clip and resolve once it has ended or failed
    async fn play(&self, locator: &str) -> PlaybackOutcome;

    /// Player name for logging
    fn name(&self) -> &str;
}
