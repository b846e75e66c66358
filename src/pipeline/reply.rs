use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::settings::{RoomSource, SettingsSource};
use super::state::{TurnError, TurnOutcome, TurnState};
use super::turn::{display_model_name, TurnContext};
use crate::backend::{BackendError, ChatBackend, ChunkStream};
use crate::speech::{play_sequentially, AudioPlayer, SpeechSynthesizer};
use crate::stream::{
    parse_frame, FrameDecoder, RedrawNotifier, ResponseAssembler, StreamEvent,
    DEFAULT_FRAME_INTERVAL,
};
use crate::transcript::{MessageHandle, Role, Transcript};

/// Shown in place of the reply until the first redraw
pub const GENERATING_PLACEHOLDER: &str = "[generating…]";

/// Rendered when model, speaker or style is not selected
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "[configuration error] select a model, speaker and style";

/// Message that replaces the placeholder when the completion request fails
pub fn completion_error_message(error: &BackendError) -> String {
    match error.status() {
        Some(status) => format!("[completion error] status: {}", status),
        None => format!("[connection error]: {}", error),
    }
}

/// Collaborators of the reply pipeline
pub struct PipelineParts {
    pub backend: Arc<dyn ChatBackend>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub player: Arc<dyn AudioPlayer>,
    pub transcript: Arc<dyn Transcript>,
    pub settings: Arc<dyn SettingsSource>,
    pub rooms: Arc<dyn RoomSource>,
}

/// Runs one user turn: refine, stream, speak, persist
pub struct ReplyPipeline {
    backend: Arc<dyn ChatBackend>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    transcript: Arc<dyn Transcript>,
    settings: Arc<dyn SettingsSource>,
    rooms: Arc<dyn RoomSource>,

    /// Minimum time between two redraws of the streaming reply
    frame_interval: Duration,

    /// Set while a turn is running; a second submission is rejected
    in_flight: AtomicBool,

    /// Current stage, observable by controllers
    state: watch::Sender<TurnState>,
}

/// Releases the submission lock when the turn ends or is dropped
struct TurnGuard<'a> {
    pipeline: &'a ReplyPipeline,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        // An abandoned turn never reached Idle or Failed
        self.pipeline.state.send_if_modified(|state| {
            if state.is_active() {
                *state = TurnState::Failed;
                true
            } else {
                false
            }
        });
        self.pipeline.in_flight.store(false, Ordering::SeqCst);
    }
}

impl ReplyPipeline {
    pub fn new(parts: PipelineParts) -> Self {
        let (state, _) = watch::channel(TurnState::Idle);

        Self {
            backend: parts.backend,
            synthesizer: parts.synthesizer,
            player: parts.player,
            transcript: parts.transcript,
            settings: parts.settings,
            rooms: parts.rooms,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn state(&self) -> TurnState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TurnState> {
        self.state.subscribe()
    }

    /// Run one turn for `text`
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyInput);
        }

        let _guard = self.acquire()?;

        let ctx = match TurnContext::resolve(
            text,
            &self.settings.chat_settings(),
            self.rooms.current_room(),
        ) {
            Ok(ctx) => ctx,
            Err(e) => {
                if let TurnError::Configuration(missing) = &e {
                    warn!("Turn rejected, missing {}", missing);
                    self.transcript
                        .create(Role::Assistant, None, CONFIGURATION_ERROR_MESSAGE);
                }
                return Err(e);
            }
        };

        info!("Starting turn in room {} (model={})", ctx.room_id, ctx.model);

        self.transcript.create(Role::User, None, &ctx.text);
        let handle = self.transcript.create(
            Role::Assistant,
            Some(&display_model_name(&ctx.model)),
            GENERATING_PLACEHOLDER,
        );

        self.set_state(TurnState::Refining);
        let query = self.refine(&ctx).await;

        self.set_state(TurnState::AwaitingStream);
        let chunks = match self
            .backend
            .open_completion(&ctx.completion_request(&query))
            .await
        {
            Ok(chunks) => chunks,
            Err(e) => {
                error!("Completion request failed: {}", e);
                self.transcript
                    .update(&handle, &completion_error_message(&e));
                return Err(self.fail(TurnError::Completion(e)));
            }
        };

        self.set_state(TurnState::Streaming);
        let (reply, skipped_frames) = self
            .consume(chunks, &handle)
            .await
            .map_err(|e| self.fail(TurnError::Stream(e)))?;

        self.set_state(TurnState::Synthesizing);
        let clips = self
            .synthesizer
            .synthesize(&reply, &ctx.speaker_uuid, ctx.style_id)
            .await
            .map_err(|e| self.fail(TurnError::Synthesis(e)))?;
        let clips_ended = play_sequentially(self.player.as_ref(), &clips).await;

        self.set_state(TurnState::Persisting);
        let persisted = match self
            .backend
            .persist_message(&ctx.persist_request(&reply))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist reply {}: {}", handle.id(), e);
                false
            }
        };

        self.set_state(TurnState::Idle);
        info!(
            "Turn complete: {} ({} chars, {} clips, persisted={})",
            handle.id(),
            reply.chars().count(),
            clips.len(),
            persisted
        );

        Ok(TurnOutcome {
            message_id: handle.id().to_string(),
            text: reply,
            skipped_frames,
            clips: clips.len(),
            clips_ended,
            persisted,
        })
    }

    fn acquire(&self) -> Result<TurnGuard<'_>, TurnError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Turn already in progress, submission rejected");
            return Err(TurnError::Busy);
        }

        Ok(TurnGuard { pipeline: self })
    }

    fn set_state(&self, state: TurnState) {
        debug!("Turn state -> {:?}", state);
        self.state.send_replace(state);
    }

    fn fail(&self, error: TurnError) -> TurnError {
        self.set_state(TurnState::Failed);
        error
    }

    /// Best-effort refinement; any failure keeps the original text
    async fn refine(&self, ctx: &TurnContext) -> String {
        match self.backend.refine_query(&ctx.refine_request()).await {
            Ok(Some(refined)) => {
                debug!("Refined query: {}", refined);
                refined
            }
            Ok(None) => ctx.text.clone(),
            Err(e) => {
                warn!("Query refinement failed, using original text: {}", e);
                ctx.text.clone()
            }
        }
    }

    /// Pull the completion stream into the reply message
    ///
    /// Returns the final text and the number of frames that failed to parse.
    async fn consume(
        &self,
        mut chunks: ChunkStream,
        handle: &MessageHandle,
    ) -> Result<(String, usize), BackendError> {
        let notifier = RedrawNotifier::spawn(
            Arc::clone(&self.transcript),
            handle.clone(),
            self.frame_interval,
        );
        let mut assembler = ResponseAssembler::new(notifier);
        let mut decoder = FrameDecoder::new();
        let mut skipped = 0;

        let result = 'read: loop {
            let chunk = match chunks.next().await {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => break 'read Err(e),
                None => break 'read Ok(()),
            };

            for frame in decoder.feed(&chunk) {
                match parse_frame(&frame) {
                    Ok(StreamEvent::Done) => {
                        debug!("Done sentinel received");
                        break 'read Ok(());
                    }
                    Ok(StreamEvent::Delta { text }) => {
                        assembler.apply(&text);
                    }
                    Err(failure) => {
                        skipped += 1;
                        warn!("Skipping stream frame: {}", failure);
                    }
                }
            }
        };

        // An unterminated tail is never a complete frame
        let _tail = decoder.finish();
        let reply = assembler.finalize().await;

        match result {
            Ok(()) => Ok((reply, skipped)),
            Err(e) => {
                error!("Completion stream failed after {} chars: {}", reply.len(), e);
                Err(e)
            }
        }
    }
}
