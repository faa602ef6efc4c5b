//! HTTP layer for chatgate.
//!
//! Axum router serving the chat page, `POST /api/chat`, session history and
//! reset endpoints, and a health check. Errors are returned as
//! `{"error": "..."}` JSON bodies.

pub mod error;
pub mod handlers;
pub mod page;
pub mod render;
pub mod router;
