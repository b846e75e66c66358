use serde_json::Value;
use thiserror::Error;

use super::decoder::FRAME_PREFIX;

/// Payload that marks the end of a completion stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded event from a completion stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// End of stream; stop reading
    Done,
    /// Incremental assistant text (may be empty)
    Delta { text: String },
}

/// A frame whose payload could not be decoded
///
/// Recoverable: the stream keeps going after one of these.
#[derive(Debug, Clone, Error)]
#[error("malformed stream frame ({reason}): {payload}")]
pub struct ParseFailure {
    pub payload: String,
    pub reason: String,
}

/// Where the incremental text sits in a `chat.completion.chunk`
const CONTENT_POINTER: &str = "/choices/0/delta/content";

/// Interpret one `data: ` frame
///
/// Only undecodable JSON is a failure. Any well-formed payload without text
/// at the usual place yields an empty delta.
pub fn parse_frame(frame: &str) -> Result<StreamEvent, ParseFailure> {
    let payload = frame.strip_prefix(FRAME_PREFIX).unwrap_or(frame).trim();

    if payload == DONE_SENTINEL {
        return Ok(StreamEvent::Done);
    }

    let chunk: Value = serde_json::from_str(payload).map_err(|e| ParseFailure {
        payload: payload.to_string(),
        reason: e.to_string(),
    })?;

    let text = chunk
        .pointer(CONTENT_POINTER)
        .map(content_text)
        .unwrap_or_default();

    Ok(StreamEvent::Delta { text })
}

/// Text of a `content` value; falsy values are empty, other scalars are stringified
fn content_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        other => other.to_string(),
    }
}
