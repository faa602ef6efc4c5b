//! Local transcript kept by the terminal client.
//!
//! Mirrors what the user saw, including error replies. It is never sent to
//! the gateway and can diverge from the server-side history.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "You"),
            Speaker::Bot => write!(f, "Bot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ChatTranscript {
    entries: Vec<Entry>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push(Entry {
            speaker,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shorten `text` to at most `max` characters for list views.
pub fn preview(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut transcript = ChatTranscript::new();
        transcript.push(Speaker::User, "hi");
        transcript.push(Speaker::Bot, "hello");
        assert_eq!(transcript.entries().len(), 2);
        assert_eq!(transcript.entries()[1].speaker, Speaker::Bot);
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("one\ntwo", 20), "one two");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "ééééééééééé";
        let out = preview(text, 8);
        assert_eq!(out, "ééééé...");
    }
}
