pub mod backend;
pub mod config;
pub mod http;
pub mod pipeline;
pub mod prompts;
pub mod speech;
pub mod stream;
pub mod transcript;
pub mod voice;

pub use backend::{BackendError, ChatBackend, ChunkStream, HttpChatBackend};
pub use config::Config;
pub use http::{create_router, AppState};
pub use pipeline::{
    ChatSettings, PipelineParts, ReplyPipeline, SharedSettings, TurnError, TurnOutcome, TurnState,
};
pub use speech::{AudioPlayer, AudioPlayerFactory, HttpSpeechSynthesizer, PlaybackOutcome, SpeechSynthesizer};
pub use stream::{parse_frame, FrameDecoder, ResponseAssembler, StreamEvent};
pub use transcript::{ConsoleTranscript, MemoryTranscript, MessageHandle, Role, Transcript};
pub use voice::{Transcriber, VoiceInput};
