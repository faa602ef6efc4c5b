//! Shared domain types for chatgate.
//!
//! Messages and completion requests exchanged with the hosted LLM API, the
//! `/api/chat` wire format, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
