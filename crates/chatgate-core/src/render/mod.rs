//! Rendering helpers shared by the browser and terminal clients.

pub mod fence;

pub use fence::{DEFAULT_LANGUAGE, Segment, split_fences};
