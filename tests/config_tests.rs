// Integration tests for configuration loading

use std::time::Duration;
use tempfile::TempDir;
use voice_chat::Config;

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("voice-chat.toml");
    std::fs::write(&path, contents).unwrap();
    // Loaded without extension, as the CLI does
    dir.path().join("voice-chat").to_string_lossy().into_owned()
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[service]
name = "kitchen-voice"

[service.http]
bind = "0.0.0.0"
port = 9000

[backend]
base_url = "http://backend.local:8000/"

[chat]
model = "models/Llama-3-8B.gguf"
speaker_uuid = "speaker-uuid"
style_id = 3
room_id = "room-1"

[speech]
synthesize_path = "/api/tts"

[render]
frame_interval_ms = 33
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.service.name, "kitchen-voice");
    assert_eq!(config.service.http.port, 9000);
    assert_eq!(config.backend.base_url, "http://backend.local:8000/");
    assert_eq!(config.speech.synthesize_path, "/api/tts");
    assert_eq!(config.render.frame_interval(), Duration::from_millis(33));

    let settings = config.chat.settings();
    assert_eq!(settings.model.as_deref(), Some("models/Llama-3-8B.gguf"));
    assert_eq!(settings.style_id, Some(3));
    assert_eq!(settings.prompt_id, None);
    assert_eq!(config.chat.room_id.as_deref(), Some("room-1"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent").to_string_lossy().into_owned();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.service.name, "voice-chat");
    assert_eq!(config.service.http.bind, "127.0.0.1");
    assert_eq!(config.service.http.port, 8787);
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.speech.synthesize_path, "/v1/audio/synthesize");
    assert_eq!(config.render.frame_interval(), Duration::from_millis(16));
    assert_eq!(config.chat.model, None);
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[chat]
speaker_uuid = "speaker-uuid"
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.chat.speaker_uuid.as_deref(), Some("speaker-uuid"));
    assert_eq!(config.chat.style_id, None);
    assert_eq!(config.service.http.port, 8787);
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[playback]
command = "aplay"
"#,
    );

    std::env::set_var("VOICE_CHAT__PLAYBACK__COMMAND", "mpv");
    let config = Config::load(&path);
    std::env::remove_var("VOICE_CHAT__PLAYBACK__COMMAND");

    assert_eq!(config.unwrap().playback.command.as_deref(), Some("mpv"));
}

#[test]
fn test_invalid_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[render]
frame_interval_ms = "soon"
"#,
    );

    assert!(Config::load(&path).is_err());
}
