//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a line (already trimmed; may be empty).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

impl From<ReadlineEvent> for InputEvent {
    fn from(event: ReadlineEvent) -> Self {
        match event {
            ReadlineEvent::Line(line) => InputEvent::Message(line.trim().to_string()),
            ReadlineEvent::Eof => InputEvent::Eof,
            ReadlineEvent::Interrupted => InputEvent::Interrupted,
        }
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given prompt.
    ///
    /// The returned `SharedWriter` prints without clobbering the prompt line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read a line of input. Read errors are treated as end of input.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(event) => {
                if let ReadlineEvent::Line(line) = &event {
                    if !line.trim().is_empty() {
                        self.rl.add_history_entry(line.clone());
                    }
                }
                event.into()
            }
            Err(_) => InputEvent::Eof,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_trimmed() {
        let event: InputEvent = ReadlineEvent::Line("  hello \n".to_string()).into();
        assert_eq!(event, InputEvent::Message("hello".to_string()));
    }

    #[test]
    fn test_whitespace_line_becomes_empty_message() {
        let event: InputEvent = ReadlineEvent::Line(" \t ".to_string()).into();
        assert_eq!(event, InputEvent::Message(String::new()));
    }

    #[test]
    fn test_control_events() {
        assert_eq!(InputEvent::from(ReadlineEvent::Eof), InputEvent::Eof);
        assert_eq!(
            InputEvent::from(ReadlineEvent::Interrupted),
            InputEvent::Interrupted
        );
    }
}
