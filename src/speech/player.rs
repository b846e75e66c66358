use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{AudioPlayer, PlaybackOutcome};
use crate::config::PlaybackConfig;

/// Plays each clip by running an external program (`mpv`, `ffplay`, `afplay`, ...)
///
/// The locator is appended as the last argument; the clip is done when the
/// process exits.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait::async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, locator: &str) -> PlaybackOutcome {
        debug!("Playing {} with {}", locator, self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(locator)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => PlaybackOutcome::Ended,
            Ok(status) => PlaybackOutcome::Error(format!("{} exited with {}", self.program, status)),
            Err(e) => PlaybackOutcome::Error(format!("failed to run {}: {}", self.program, e)),
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Logs clips instead of playing them
#[derive(Debug, Default)]
pub struct SilentPlayer;

#[async_trait::async_trait]
impl AudioPlayer for SilentPlayer {
    async fn play(&self, locator: &str) -> PlaybackOutcome {
        info!("Audio clip ready: {}", locator);
        PlaybackOutcome::Ended
    }

    fn name(&self) -> &str {
        "silent"
    }
}

/// Audio player factory
pub struct AudioPlayerFactory;

impl AudioPlayerFactory {
    /// Command player when a program is configured, otherwise silent
    pub fn create(config: &PlaybackConfig) -> Box<dyn AudioPlayer> {
        match config.command.as_deref().map(str::trim) {
            Some(program) if !program.is_empty() => {
                Box::new(CommandPlayer::new(program, config.args.clone()))
            }
            _ => Box::new(SilentPlayer),
        }
    }
}

/// Play clips strictly one after another
///
/// A failed clip is logged and treated as finished. Returns the number of
/// clips that ended normally.
pub async fn play_sequentially(player: &dyn AudioPlayer, locators: &[String]) -> usize {
    let mut ended = 0;

    for (index, locator) in locators.iter().enumerate() {
        match player.play(locator).await {
            PlaybackOutcome::Ended => ended += 1,
            PlaybackOutcome::Error(reason) => {
                warn!(
                    "Playback of clip {}/{} via {} failed: {}",
                    index + 1,
                    locators.len(),
                    player.name(),
                    reason
                );
            }
        }
    }

    ended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults_to_silent() {
        let player = AudioPlayerFactory::create(&PlaybackConfig::default());
        assert_eq!(player.name(), "silent");

        let blank = PlaybackConfig {
            command: Some("  ".to_string()),
            args: vec![],
        };
        assert_eq!(AudioPlayerFactory::create(&blank).name(), "silent");
    }

    #[test]
    fn test_factory_builds_command_player() {
        let config = PlaybackConfig {
            command: Some("mpv".to_string()),
            args: vec!["--no-video".to_string()],
        };
        assert_eq!(AudioPlayerFactory::create(&config).name(), "mpv");
    }

    #[tokio::test]
    async fn test_missing_program_is_a_playback_error() {
        let player = CommandPlayer::new("voice-chat-no-such-player", vec![]);
        match player.play("clip.wav").await {
            PlaybackOutcome::Error(reason) => assert!(reason.contains("voice-chat-no-such-player")),
            PlaybackOutcome::Ended => panic!("missing program should not play"),
        }
    }

    #[tokio::test]
    async fn test_play_sequentially_counts_ended_clips() {
        let clips = vec!["a.wav".to_string(), "b.wav".to_string()];
        assert_eq!(play_sequentially(&SilentPlayer, &clips).await, 2);

        let broken = CommandPlayer::new("voice-chat-no-such-player", vec![]);
        assert_eq!(play_sequentially(&broken, &clips).await, 0);
    }
}
