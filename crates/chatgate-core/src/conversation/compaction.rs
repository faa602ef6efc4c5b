//! Lossy history compaction.
//!
//! When a conversation grows past the threshold, everything except the most
//! recent messages is flattened into a single system message of the form
//! `"<prefix>User: ...\nBot: ..."`. No LLM call is made; the digest is a
//! verbatim concatenation. An earlier digest is folded into the next one like
//! any other message.

use chatgate_types::config::{ConversationConfig, DEFAULT_SUMMARY_PREFIX};
use chatgate_types::llm::{Message, MessageRole};

/// Threshold and window for history compaction.
#[derive(Debug, Clone)]
pub struct CompactionPolicy {
    /// Compact when the history is strictly longer than this.
    pub threshold: usize,
    /// Number of most recent messages kept verbatim.
    pub keep_recent: usize,
    /// Text placed before the flattened digest.
    pub summary_prefix: String,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            threshold: 10,
            keep_recent: 5,
            summary_prefix: DEFAULT_SUMMARY_PREFIX.to_string(),
        }
    }
}

impl CompactionPolicy {
    pub fn from_config(config: &ConversationConfig) -> Self {
        Self {
            threshold: config.compaction_threshold,
            keep_recent: config.keep_recent,
            summary_prefix: config.summary_prefix.clone(),
        }
    }

    pub fn should_compact(&self, len: usize) -> bool {
        len > self.threshold
    }

    /// Split messages into `(to_summarize, to_keep)`.
    ///
    /// `to_keep` holds the most recent `keep_recent` messages; with fewer
    /// messages than that, nothing is summarized.
    pub fn select_messages_to_summarize<'a>(
        &self,
        messages: &'a [Message],
    ) -> (&'a [Message], &'a [Message]) {
        if messages.len() <= self.keep_recent {
            (&[], messages)
        } else {
            let split_point = messages.len() - self.keep_recent;
            (&messages[..split_point], &messages[split_point..])
        }
    }

    /// Flatten messages into a single system message.
    pub fn digest(&self, messages: &[Message]) -> Message {
        let summary = messages
            .iter()
            .map(|m| format!("{}: {}", speaker_label(m.role), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        Message::system(format!("{}{summary}", self.summary_prefix))
    }

    /// Compact `messages` in place if they exceed the threshold.
    ///
    /// Returns `true` when compaction fired. Afterwards the history is
    /// `[digest, ..last keep_recent]`.
    pub fn compact(&self, messages: &mut Vec<Message>) -> bool {
        if !self.should_compact(messages.len()) {
            return false;
        }

        let (to_summarize, to_keep) = self.select_messages_to_summarize(&messages[..]);
        let mut compacted = Vec::with_capacity(to_keep.len() + 1);
        compacted.push(self.digest(to_summarize));
        compacted.extend_from_slice(to_keep);
        *messages = compacted;
        true
    }
}

/// Speaker label used inside a digest. Everything that is not the user
/// (including earlier system messages and digests) is attributed to the bot.
fn speaker_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "User",
        MessageRole::System | MessageRole::Assistant => "Bot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(len: usize) -> Vec<Message> {
        let mut messages = vec![Message::system("seed")];
        for i in 1..len {
            if i % 2 == 1 {
                messages.push(Message::user(format!("q{i}")));
            } else {
                messages.push(Message::assistant(format!("a{i}")));
            }
        }
        messages
    }

    #[test]
    fn test_select_messages_fewer_than_keep() {
        let policy = CompactionPolicy::default();
        let messages = history(3);
        let (to_summarize, to_keep) = policy.select_messages_to_summarize(&messages);
        assert!(to_summarize.is_empty());
        assert_eq!(to_keep.len(), 3);
    }

    #[test]
    fn test_select_messages_splits_correctly() {
        let policy = CompactionPolicy::default();
        let messages = history(11);
        let (to_summarize, to_keep) = policy.select_messages_to_summarize(&messages);
        assert_eq!(to_summarize.len(), 6);
        assert_eq!(to_keep.len(), 5);
        assert_eq!(to_summarize[0].content, "seed");
        assert_eq!(to_keep[0].content, "a6");
        assert_eq!(to_keep[4].content, "a10");
    }

    #[test]
    fn test_digest_format() {
        let policy = CompactionPolicy::default();
        let digest = policy.digest(&[
            Message::system("be nice"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);
        assert_eq!(digest.role, MessageRole::System);
        assert_eq!(
            digest.content,
            "Summary of conversation so far: Bot: be nice\nUser: hi\nBot: hello"
        );
    }

    #[test]
    fn test_compact_at_threshold_is_noop() {
        let policy = CompactionPolicy::default();
        let mut messages = history(10);
        assert!(!policy.compact(&mut messages));
        assert_eq!(messages.len(), 10);
    }

    #[test]
    fn test_compact_over_threshold_yields_six() {
        let policy = CompactionPolicy::default();
        for len in [11, 12, 25] {
            let mut messages = history(len);
            let last = messages.last().cloned().unwrap();
            assert!(policy.compact(&mut messages));
            assert_eq!(messages.len(), 6);
            assert_eq!(messages[0].role, MessageRole::System);
            assert!(messages[0].content.starts_with(DEFAULT_SUMMARY_PREFIX));
            assert_eq!(messages[5], last);
        }
    }

    #[test]
    fn test_compact_folds_previous_digest() {
        let policy = CompactionPolicy::default();
        let mut messages = history(11);
        policy.compact(&mut messages);
        messages.extend((0..5).map(|i| Message::user(format!("more{i}"))));
        assert!(policy.compact(&mut messages));
        assert!(messages[0].content.contains("Bot: Summary of conversation so far: "));
    }

    #[test]
    fn test_from_config() {
        let config = ConversationConfig {
            compaction_threshold: 20,
            keep_recent: 8,
            summary_prefix: "Earlier: ".to_string(),
            ..Default::default()
        };
        let policy = CompactionPolicy::from_config(&config);
        assert!(!policy.should_compact(20));
        assert!(policy.should_compact(21));
        assert_eq!(policy.keep_recent, 8);
        assert!(policy.digest(&[]).content.starts_with("Earlier: "));
    }
}
