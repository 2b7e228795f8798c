//! Incremental server-sent-events parsing
//!
//! Both upstream chat streams (Gemini `alt=sse` and OpenAI-compatible
//! `chat/completions`) deliver their payloads in `data:` lines only, so
//! the parser tracks just those: comment lines are skipped, a blank line
//! dispatches the accumulated event, and input may be fed in arbitrary
//! chunk boundaries.

/// Buffering SSE parser yielding one string per complete event.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the response body; returns the data payloads of all
    /// events completed by this chunk.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.find('\n') {
            let mut line = self.buffer[..pos].to_string();
            self.buffer.drain(..=pos);

            if line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                self.dispatch(&mut events);
            } else {
                self.consume_line(&line);
            }
        }

        events
    }

    /// Flush any event left unterminated when the body ends.
    pub fn finish(&mut self) -> Vec<String> {
        let mut line = std::mem::take(&mut self.buffer);
        if line.ends_with('\r') {
            line.pop();
        }
        if !line.is_empty() {
            self.consume_line(&line);
        }

        let mut events = Vec::new();
        self.dispatch(&mut events);
        events
    }

    fn consume_line(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data_lines.push(value.trim_start().to_string());
        } else if line == "data" {
            self.data_lines.push(String::new());
        }
    }

    fn dispatch(&mut self, events: &mut Vec<String>) {
        if self.data_lines.is_empty() {
            return;
        }
        events.push(self.data_lines.join("\n"));
        self.data_lines.clear();
    }
}
