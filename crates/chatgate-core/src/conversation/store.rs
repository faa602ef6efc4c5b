//! Conversation store for a single session.
//!
//! The store is an ordered list of role-tagged messages whose first element
//! is always a system message. A chat turn never mutates the store directly:
//! [`ConversationStore::begin_turn`] stages the user message (and any
//! compaction) on a copy, and [`PendingTurn::commit`] swaps the copy in
//! together with the assistant reply. A failed upstream call simply drops the
//! pending turn, so no orphaned user message is left behind.

use chatgate_types::error::ChatError;
use chatgate_types::llm::{Message, MessageRole};

use super::compaction::CompactionPolicy;

/// Ordered, bounded conversation history.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Create a store seeded with the standing system instructions.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: a store holds at least its system message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message to the end of the history.
    pub fn append(&mut self, message: Message) -> Result<(), ChatError> {
        if message.content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.messages.push(message);
        Ok(())
    }

    /// Apply the compaction policy. Returns whether it fired.
    pub fn maybe_compact(&mut self, policy: &CompactionPolicy) -> bool {
        policy.compact(&mut self.messages)
    }

    /// Append a user message and re-evaluate compaction.
    pub fn append_user(
        &mut self,
        content: impl Into<String>,
        policy: &CompactionPolicy,
    ) -> Result<bool, ChatError> {
        self.append(Message::user(content))?;
        Ok(self.maybe_compact(policy))
    }

    /// Stage a user turn without touching this store.
    ///
    /// The returned [`PendingTurn`] holds the history to send upstream: the
    /// committed messages plus the user prompt, compacted if needed.
    pub fn begin_turn(
        &self,
        prompt: &str,
        policy: &CompactionPolicy,
    ) -> Result<PendingTurn, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let mut staged = self.clone();
        let compacted = staged.append_user(prompt, policy)?;
        Ok(PendingTurn { staged, compacted })
    }
}

/// A user turn staged against a store but not yet committed.
#[derive(Debug)]
pub struct PendingTurn {
    staged: ConversationStore,
    compacted: bool,
}

impl PendingTurn {
    /// History to send to the completion API.
    pub fn messages(&self) -> &[Message] {
        self.staged.messages()
    }

    /// Whether staging the user message triggered compaction.
    pub fn compacted(&self) -> bool {
        self.compacted
    }

    /// Append the assistant reply and replace `store` with the staged history.
    pub fn commit(self, reply: impl Into<String>, store: &mut ConversationStore) -> Result<(), ChatError> {
        let mut staged = self.staged;
        staged.append(Message::assistant(reply))?;
        debug_assert_eq!(staged.messages[0].role, MessageRole::System);
        *store = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_len(len: usize) -> ConversationStore {
        let mut store = ConversationStore::new("seed");
        for i in 1..len {
            let msg = if i % 2 == 1 {
                Message::user(format!("q{i}"))
            } else {
                Message::assistant(format!("a{i}"))
            };
            store.append(msg).unwrap();
        }
        store
    }

    #[test]
    fn test_new_store_starts_with_system() {
        let store = ConversationStore::new("You are helpful.");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.messages()[0].role, MessageRole::System);
    }

    #[test]
    fn test_append_rejects_blank_content() {
        let mut store = ConversationStore::new("seed");
        assert!(matches!(
            store.append(Message::user("   ")),
            Err(ChatError::EmptyMessage)
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_user_below_threshold_never_compacts() {
        for len in 1..=9 {
            let mut store = store_with_len(len);
            let compacted = store.append_user("next", &CompactionPolicy::default()).unwrap();
            assert!(!compacted);
            assert_eq!(store.len(), len + 1);
        }
    }

    #[test]
    fn test_append_user_to_ten_compacts_to_six() {
        let mut store = store_with_len(10);
        let compacted = store.append_user("eleventh", &CompactionPolicy::default()).unwrap();
        assert!(compacted);
        assert_eq!(store.len(), 6);
        assert_eq!(store.messages()[0].role, MessageRole::System);
        assert_eq!(store.messages()[5].content, "eleventh");
    }

    #[test]
    fn test_maybe_compact_at_eleven() {
        let mut store = store_with_len(11);
        assert!(store.maybe_compact(&CompactionPolicy::default()));
        assert_eq!(store.len(), 6);
        assert!(!store.maybe_compact(&CompactionPolicy::default()));
    }

    #[test]
    fn test_begin_turn_leaves_store_untouched() {
        let store = ConversationStore::new("seed");
        let pending = store.begin_turn("hi", &CompactionPolicy::default()).unwrap();
        assert_eq!(pending.messages().len(), 2);
        assert_eq!(pending.messages()[1], Message::user("hi"));
        assert!(!pending.compacted());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_begin_turn_rejects_blank_prompt() {
        let store = ConversationStore::new("seed");
        assert!(matches!(
            store.begin_turn(" \n\t", &CompactionPolicy::default()),
            Err(ChatError::EmptyPrompt)
        ));
    }

    #[test]
    fn test_commit_appends_reply() {
        let mut store = ConversationStore::new("seed");
        let pending = store.begin_turn("hi", &CompactionPolicy::default()).unwrap();
        pending.commit("hello!", &mut store).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.messages()[2], Message::assistant("hello!"));
    }

    #[test]
    fn test_dropped_turn_leaves_no_orphan() {
        let store = store_with_len(5);
        let before = store.messages().to_vec();
        let pending = store.begin_turn("lost", &CompactionPolicy::default()).unwrap();
        drop(pending);
        assert_eq!(store.messages(), before.as_slice());
    }

    #[test]
    fn test_compacting_turn_commits_seven() {
        let mut store = store_with_len(10);
        let pending = store.begin_turn("q10", &CompactionPolicy::default()).unwrap();
        assert!(pending.compacted());
        assert_eq!(pending.messages().len(), 6);
        assert_eq!(pending.messages()[5].content, "q10");
        pending.commit("a11", &mut store).unwrap();
        assert_eq!(store.len(), 7);
        assert_eq!(store.messages()[0].role, MessageRole::System);
    }

    #[test]
    fn test_compaction_refires_each_turn_when_over_threshold() {
        let policy = CompactionPolicy {
            threshold: 6,
            keep_recent: 5,
            ..Default::default()
        };
        let mut store = ConversationStore::new("seed");
        let mut fired = 0;
        for i in 0..6 {
            let pending = store.begin_turn(&format!("q{i}"), &policy).unwrap();
            if pending.compacted() {
                fired += 1;
            }
            pending.commit(format!("a{i}"), &mut store).unwrap();
        }
        // 7 messages after three turns; every later turn exceeds the threshold again.
        assert_eq!(fired, 3);
        assert!(store.len() <= 7);
    }
}
