use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

use crate::transcript::{MessageHandle, Transcript};

/// One redraw per ~60Hz frame
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Text as shown in the transcript: trimmed, after a single line break
pub fn display_text(text: &str) -> String {
    format!("\n{}", text.trim())
}

/// Rate-limited redraws of one message
///
/// Requests go into a `watch` channel, which only keeps the newest value.
/// A renderer task draws at most once per frame interval, always the most
/// recent text; requests made in between are coalesced.
pub struct RedrawNotifier {
    tx: watch::Sender<String>,
    renderer: JoinHandle<Option<String>>,
    transcript: Arc<dyn Transcript>,
    handle: MessageHandle,
}

impl RedrawNotifier {
    /// Start the renderer task for `handle`
    pub fn spawn(
        transcript: Arc<dyn Transcript>,
        handle: MessageHandle,
        frame_interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(String::new());

        let renderer = tokio::spawn(render_loop(
            rx,
            Arc::clone(&transcript),
            handle.clone(),
            frame_interval,
        ));

        Self {
            tx,
            renderer,
            transcript,
            handle,
        }
    }

    /// Ask for `text` to be drawn on the next frame
    pub fn request(&self, text: &str) {
        self.tx.send_modify(|current| {
            current.clear();
            current.push_str(text);
        });
    }

    /// Stop the renderer and make sure `final_text` is what ends up drawn
    pub async fn finish(self, final_text: &str) {
        let Self {
            tx,
            renderer,
            transcript,
            handle,
        } = self;
        drop(tx);

        let last_drawn = match renderer.await {
            Ok(last_drawn) => last_drawn,
            Err(e) => {
                error!("Renderer task for {} failed: {}", handle.id(), e);
                None
            }
        };

        if last_drawn.as_deref() != Some(final_text) {
            transcript.update(&handle, &display_text(final_text));
        }
    }
}

async fn render_loop(
    mut rx: watch::Receiver<String>,
    transcript: Arc<dyn Transcript>,
    handle: MessageHandle,
    frame_interval: Duration,
) -> Option<String> {
    let mut last_drawn = None;

    while rx.changed().await.is_ok() {
        let text = rx.borrow_and_update().clone();
        transcript.update(&handle, &display_text(&text));
        last_drawn = Some(text);

        tokio::time::sleep(frame_interval).await;
    }

    last_drawn
}

/// Rebuilds the assistant reply from ordered deltas
pub struct ResponseAssembler {
    text: String,
    notifier: Option<RedrawNotifier>,
}

impl ResponseAssembler {
    /// Assembler that redraws through `notifier` after every delta
    pub fn new(notifier: RedrawNotifier) -> Self {
        Self {
            text: String::new(),
            notifier: Some(notifier),
        }
    }

    /// Assembler with no rendering attached
    pub fn detached() -> Self {
        Self {
            text: String::new(),
            notifier: None,
        }
    }

    /// Append a delta, returning the full text so far
    pub fn apply(&mut self, delta: &str) -> &str {
        self.text.push_str(delta);

        if let Some(notifier) = &self.notifier {
            notifier.request(&self.text);
        }

        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flush the last redraw and hand over the final text
    pub async fn finalize(self) -> String {
        if let Some(notifier) = self.notifier {
            notifier.finish(&self.text).await;
        }
        self.text
    }
}
