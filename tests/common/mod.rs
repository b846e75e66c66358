// Shared test doubles for pipeline, voice and control API tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use voice_chat::backend::{
    BackendError, ChatBackend, ChunkStream, CompletionRequest, PersistMessageRequest,
    RefineQueryRequest, TranscriptionResponse,
};
use voice_chat::pipeline::{ChatSettings, PipelineParts, ReplyPipeline, SharedSettings};
use voice_chat::speech::{AudioPlayer, PlaybackOutcome, SpeechSynthesizer};
use voice_chat::transcript::{MemoryTranscript, MessageHandle, Role, Transcript};
use voice_chat::voice::Transcriber;

/// Ordered record of what the collaborators saw
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// `data: ` frame carrying one content delta
pub fn delta_frame(text: &str) -> String {
    let payload = serde_json::json!({
        "object": "chat.completion.chunk",
        "choices": [{ "index": 0, "delta": { "content": text } }]
    });
    format!("data: {}\n\n", payload)
}

pub fn done_frame() -> String {
    "data: [DONE]\n\n".to_string()
}

/// Split a body into chunks of `size` bytes (mid-line, mid-character)
pub fn rechunk(body: &str, size: usize) -> Vec<Vec<u8>> {
    body.as_bytes().chunks(size).map(|c| c.to_vec()).collect()
}

pub enum CompletionScript {
    Status(u16),
    Chunks(Vec<Vec<u8>>),
    ChunksThenStatus(Vec<Vec<u8>>, u16),
}

pub struct MockBackend {
    pub log: EventLog,
    refine: Result<Option<String>, u16>,
    completion: Mutex<Option<CompletionScript>>,
    persist_status: Option<u16>,
    gate: Option<Arc<Notify>>,
    pub refine_requests: Mutex<Vec<RefineQueryRequest>>,
    pub completion_requests: Mutex<Vec<CompletionRequest>>,
    pub persist_requests: Mutex<Vec<PersistMessageRequest>>,
}

impl MockBackend {
    pub fn new(log: EventLog, completion: CompletionScript) -> Self {
        Self {
            log,
            refine: Ok(None),
            completion: Mutex::new(Some(completion)),
            persist_status: None,
            gate: None,
            refine_requests: Mutex::new(Vec::new()),
            completion_requests: Mutex::new(Vec::new()),
            persist_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn streaming(log: EventLog, body: &str, chunk_size: usize) -> Self {
        Self::new(log, CompletionScript::Chunks(rechunk(body, chunk_size)))
    }

    pub fn with_refine(mut self, refine: Result<Option<String>, u16>) -> Self {
        self.refine = refine;
        self
    }

    pub fn with_persist_status(mut self, status: u16) -> Self {
        self.persist_status = Some(status);
        self
    }

    /// Hold the completion request until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn request_count(&self) -> usize {
        self.refine_requests.lock().unwrap().len()
            + self.completion_requests.lock().unwrap().len()
            + self.persist_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn refine_query(
        &self,
        request: &RefineQueryRequest,
    ) -> Result<Option<String>, BackendError> {
        self.log.push("refine:start");
        self.refine_requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.log.push("refine:end");
        self.refine.clone().map_err(BackendError::Status)
    }

    async fn open_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, BackendError> {
        self.log.push("completion:start");
        self.completion_requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let script = self
            .completion
            .lock()
            .unwrap()
            .take()
            .expect("completion requested twice");

        match script {
            CompletionScript::Status(status) => Err(BackendError::Status(status)),
            CompletionScript::Chunks(chunks) => {
                Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
            }
            CompletionScript::ChunksThenStatus(chunks, status) => Ok(stream::iter(
                chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(BackendError::Status(status)))),
            )
            .boxed()),
        }
    }

    async fn persist_message(&self, request: &PersistMessageRequest) -> Result<(), BackendError> {
        self.log.push("persist");
        self.persist_requests.lock().unwrap().push(request.clone());
        match self.persist_status {
            Some(status) => Err(BackendError::Status(status)),
            None => Ok(()),
        }
    }
}

pub struct MockSynthesizer {
    log: EventLog,
    urls: Option<Vec<String>>,
    pub texts: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new(log: EventLog, urls: &[&str]) -> Self {
        Self {
            log,
            urls: Some(urls.iter().map(|u| u.to_string()).collect()),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(log: EventLog) -> Self {
        Self {
            log,
            urls: None,
            texts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _speaker: &str, _style: u32) -> Result<Vec<String>> {
        self.log.push("synthesize");
        self.texts.lock().unwrap().push(text.to_string());
        match &self.urls {
            Some(urls) => Ok(urls.clone()),
            None => anyhow::bail!("synthesis engine offline"),
        }
    }
}

/// Player that takes a little time per clip and fails clips containing "broken"
pub struct MockPlayer {
    log: EventLog,
}

impl MockPlayer {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl AudioPlayer for MockPlayer {
    async fn play(&self, locator: &str) -> PlaybackOutcome {
        self.log.push(format!("play:start:{}", locator));
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.log.push(format!("play:end:{}", locator));

        if locator.contains("broken") {
            PlaybackOutcome::Error("decode error".to_string())
        } else {
            PlaybackOutcome::Ended
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Memory transcript that also remembers every update
#[derive(Default)]
pub struct RecordingTranscript {
    pub inner: MemoryTranscript,
    pub updates: Mutex<Vec<(String, String)>>,
}

impl RecordingTranscript {
    pub fn updates_for(&self, handle_id: &str) -> Vec<String> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == handle_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Transcript for RecordingTranscript {
    fn create(&self, role: Role, label: Option<&str>, text: &str) -> MessageHandle {
        self.inner.create(role, label, text)
    }

    fn update(&self, handle: &MessageHandle, text: &str) {
        self.updates
            .lock()
            .unwrap()
            .push((handle.id().to_string(), text.to_string()));
        self.inner.update(handle, text);
    }
}

pub struct MockTranscriber {
    response: Result<TranscriptionResponse, u16>,
}

impl MockTranscriber {
    pub fn text(text: &str) -> Self {
        Self {
            response: Ok(TranscriptionResponse {
                text: Some(text.to_string()),
                error: None,
            }),
        }
    }

    pub fn error(error: Option<&str>) -> Self {
        Self {
            response: Ok(TranscriptionResponse {
                text: None,
                error: error.map(str::to_string),
            }),
        }
    }

    pub fn unreachable(status: u16) -> Self {
        Self {
            response: Err(status),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _path: &Path) -> Result<TranscriptionResponse, BackendError> {
        self.response.clone().map_err(BackendError::Status)
    }
}

pub fn complete_settings() -> ChatSettings {
    ChatSettings {
        model: Some("models/Llama-3-8B.gguf".to_string()),
        speaker_uuid: Some("speaker-uuid".to_string()),
        style_id: Some(3),
        prompt_id: Some("casual".to_string()),
    }
}

pub struct Harness {
    pub pipeline: Arc<ReplyPipeline>,
    pub backend: Arc<MockBackend>,
    pub synthesizer: Arc<MockSynthesizer>,
    pub transcript: Arc<RecordingTranscript>,
    pub settings: SharedSettings,
    pub log: EventLog,
}

pub fn harness(
    log: EventLog,
    backend: MockBackend,
    synthesizer: MockSynthesizer,
    settings: SharedSettings,
) -> Harness {
    let backend = Arc::new(backend);
    let synthesizer = Arc::new(synthesizer);
    let transcript = Arc::new(RecordingTranscript::default());

    let pipeline = ReplyPipeline::new(PipelineParts {
        backend: backend.clone(),
        synthesizer: synthesizer.clone(),
        player: Arc::new(MockPlayer::new(log.clone())),
        transcript: transcript.clone(),
        settings: Arc::new(settings.clone()),
        rooms: Arc::new(settings.clone()),
    })
    .with_frame_interval(Duration::from_millis(1));

    Harness {
        pipeline: Arc::new(pipeline),
        backend,
        synthesizer,
        transcript,
        settings,
        log,
    }
}

pub fn ready_settings() -> SharedSettings {
    SharedSettings::new(complete_settings(), Some("room-1".to_string()))
}
