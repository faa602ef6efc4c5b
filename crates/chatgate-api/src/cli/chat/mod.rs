//! Interactive terminal client for a running gateway.
//!
//! Talks to `POST /api/chat` like the browser page does: spinner while a
//! request is in flight, a fixed error reply on failure, a local transcript,
//! and syntax-highlighted code fences. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod client;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod transcript;
