//! Conversation logic for chatgate.
//!
//! This crate owns the per-session conversation stores and their compaction
//! policy, the `LlmProvider` port the infrastructure layer implements, the
//! completion gateway that runs one chat turn, and code-fence extraction for
//! rendering. It depends only on `chatgate-types` -- never on
//! `chatgate-infra` or any HTTP crate.

pub mod conversation;
pub mod gateway;
pub mod llm;
pub mod render;
