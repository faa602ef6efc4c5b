//! Conversation state: per-session stores, compaction, and the registry
//! that maps session ids to stores.

pub mod compaction;
pub mod registry;
pub mod store;

pub use compaction::CompactionPolicy;
pub use registry::{Session, SessionHandle, SessionRegistry};
pub use store::{ConversationStore, PendingTurn};
