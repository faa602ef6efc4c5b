//! Infrastructure layer for chatgate.
//!
//! Contains the OpenAI-compatible implementation of the `LlmProvider` trait
//! defined in `chatgate-core`, the TOML config loader, and API key resolution
//! from the environment.

pub mod config;
pub mod llm;
pub mod secret;
