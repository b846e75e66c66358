use tracing::debug;

/// Prefix every event frame starts with
pub const FRAME_PREFIX: &str = "data: ";

/// Reassembles a chunked event stream into complete `data: ` frames
///
/// One decoder belongs to exactly one stream. Chunk boundaries may fall
/// anywhere, including inside a line or inside a multibyte character.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Text of the line that has not seen its terminator yet
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk and collect every frame it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode_into_buffer(chunk);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| line.starts_with(FRAME_PREFIX))
            .map(str::to_string)
            .collect()
    }

    /// Close the stream, returning the unterminated tail if there was one
    pub fn finish(mut self) -> Option<String> {
        if !self.pending.is_empty() {
            self.buffer
                .push_str(&String::from_utf8_lossy(&std::mem::take(&mut self.pending)));
        }

        if self.buffer.is_empty() {
            return None;
        }

        debug!("Discarding unterminated line ({} bytes)", self.buffer.len());
        Some(self.buffer)
    }

    fn decode_into_buffer(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        let bytes = std::mem::take(&mut self.pending);
        let mut input = bytes.as_slice();

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(e) => {
                    let (valid, after) = input.split_at(e.valid_up_to());
                    // `valid_up_to` always ends on a character boundary
                    self.buffer
                        .push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &after[len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for the next chunk
                            self.pending = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}
