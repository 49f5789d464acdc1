//! Line-framed event decoding over an incremental byte stream
//!
//! The backend streams `data: <json>\n` frames. Chunk boundaries are
//! arbitrary: one frame may arrive split across many chunks, and one chunk
//! may carry many frames. The decoder keeps the trailing incomplete line in
//! a carry-over buffer between [`FrameDecoder::feed`] calls and flushes it
//! on [`FrameDecoder::finish`].

use tracing::{debug, warn};

use super::events::StreamEvent;

/// Prefix every frame line carries
pub const FRAME_PREFIX: &str = "data: ";

/// Frame body that signals end-of-stream; never parsed as data
pub const STREAM_TERMINATOR: &str = "[DONE]";

/// Incremental decoder for one event stream; not restartable
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the stream terminator has been seen
    ///
    /// After that, no further events are produced.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume one chunk and return every event completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }

        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(line_end) = self.buffer.find('\n') {
            let line = self.buffer[..line_end].to_string();
            self.buffer.drain(..=line_end);

            if let Some(event) = self.decode_line(&line) {
                events.push(event);
            }
            if self.finished {
                break;
            }
        }

        events
    }

    /// Flush residual buffered content after the underlying stream ends
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.finished || self.buffer.trim().is_empty() {
            self.buffer.clear();
            return Vec::new();
        }

        let rest = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        for line in rest.split('\n') {
            if self.finished {
                break;
            }
            if let Some(event) = self.decode_line(line) {
                events.push(event);
            }
        }

        events
    }

    fn decode_line(&mut self, line: &str) -> Option<StreamEvent> {
        let line = line.trim();
        let body = line.strip_prefix(FRAME_PREFIX)?;

        if body == STREAM_TERMINATOR {
            debug!("stream terminator received");
            self.finished = true;
            return None;
        }

        match serde_json::from_str::<StreamEvent>(body) {
            Ok(event) => Some(event),
            Err(e) => {
                // One bad frame never aborts the stream
                warn!(error = %e, frame = body, "skipping unparseable frame");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut decoder = FrameDecoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn test_single_chunk_multiple_frames() {
        let chunk = b"data: {\"type\":\"retry\"}\ndata: {\"type\":\"day_complete\"}\n";
        let events = decode_all(&[chunk]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "retry");
        assert_eq!(events[1].event_type(), "day_complete");
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let events = decode_all(&[b"data: {\"ty", b"pe\":\"ret", b"ry\"}\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "retry");
    }

    #[test]
    fn test_unparseable_frame_is_skipped() {
        let chunk = b"data: {not json}\ndata: {\"type\":\"retry\"}\n";
        let events = decode_all(&[chunk]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "retry");
    }

    #[test]
    fn test_non_frame_lines_are_ignored() {
        let chunk = b"\nevent: ping\ndata: {\"type\":\"retry\"}\n";
        let events = decode_all(&[chunk]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_terminator_ends_decoding() {
        let mut decoder = FrameDecoder::new();
        let events = decoder.feed(b"data: {\"type\":\"retry\"}\ndata: [DONE]\ndata: {\"type\":\"retry\"}\n");
        assert_eq!(events.len(), 1);
        assert!(decoder.is_finished());

        // Nothing after the terminator, ever
        assert!(decoder.feed(b"data: {\"type\":\"retry\"}\n").is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_finish_flushes_residual_frame_without_newline() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data: {\"type\":\"retry\"}").is_empty());
        let events = decoder.finish();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "retry");
    }

    #[test]
    fn test_terminator_without_newline_on_finish() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data: [DONE]").is_empty());
        assert!(decoder.finish().is_empty());
        assert!(decoder.is_finished());
    }

    fn well_formed_stream() -> Vec<u8> {
        let frames = [
            r#"data: {"type":"progress","node":"chef","status":"started","data":{"day":1,"meal":1}}"#,
            r#"data: {"type":"validation","node":"time_checker","status":"completed","data":{"passed":true}}"#,
            r#"data: {"type":"retry","message":"nutrition out of range"}"#,
            r#"data: {"type":"meal_complete","data":{"day":1,"meal_type":"lunch","menu":"bibimbap","calories":620,"cost":5500}}"#,
            r#"data: {"type":"day_complete","data":{"day":1}}"#,
            r#"data: [DONE]"#,
        ];
        let mut bytes = Vec::new();
        for frame in frames {
            bytes.extend_from_slice(frame.as_bytes());
            bytes.push(b'\n');
        }
        bytes
    }

    proptest! {
        /// The decoded sequence is identical no matter where chunks split
        #[test]
        fn prop_chunking_invariance(splits in proptest::collection::vec(0usize..600, 0..12)) {
            let bytes = well_formed_stream();

            let baseline = decode_all(&[&bytes]);

            let mut cuts: Vec<usize> = splits.into_iter().map(|s| s % (bytes.len() + 1)).collect();
            cuts.sort_unstable();
            cuts.dedup();

            let mut chunks: Vec<&[u8]> = Vec::new();
            let mut prev = 0;
            for cut in cuts {
                chunks.push(&bytes[prev..cut]);
                prev = cut;
            }
            chunks.push(&bytes[prev..]);

            let chunked = decode_all(&chunks);
            prop_assert_eq!(chunked, baseline);
        }
    }
}
