//! Foundation Layer - error taxonomy and host contracts
//!
//! This crate provides the building blocks shared by every other pullto crate:
//! - The [`PullError`] taxonomy every failed invocation reports through
//! - The [`protocol::WorkspaceHost`] capability trait the pull pipeline consumes
//! - Small value types exchanged with the host (line endings, notification levels)

pub mod error;
pub mod protocol;

// Re-export commonly used types for convenience
pub use error::*;
pub use protocol::{EditorState, FileHandle, LineEnding, NotifyLevel, SourceDocument, WorkspaceHost};
