//! Completion stream consumption
//!
//! Raw chunks flow through three stages:
//! - `FrameDecoder` turns bytes into complete `data: ` lines
//! - `parse_frame` turns a line into a `StreamEvent`
//! - `ResponseAssembler` accumulates deltas and requests redraws

mod assembler;
mod decoder;
mod event;

pub use assembler::{display_text, RedrawNotifier, ResponseAssembler, DEFAULT_FRAME_INTERVAL};
pub use decoder::{FrameDecoder, FRAME_PREFIX};
pub use event::{parse_frame, ParseFailure, StreamEvent, DONE_SENTINEL};
