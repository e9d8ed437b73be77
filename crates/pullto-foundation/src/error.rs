//! Error handling for the pull pipeline
//!
//! Every failure aborts only the current invocation. The host shows
//! [`PullError::user_message`] to the user; nothing here is fatal to the
//! host process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a pull failed to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistSide {
    /// Writing the merged text into the interface or base class file
    Target,
    /// Removing the pulled member from the file it came from
    SourceCleanup,
}

impl std::fmt::Display for PersistSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistSide::Target => write!(f, "target write"),
            PersistSide::SourceCleanup => write!(f, "source cleanup"),
        }
    }
}

/// Core error type used throughout pullto
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PullError {
    #[error("Could not find the {what}.")]
    StructureNotFound { what: String },

    #[error("More then one file found matching {target} ({matches} matches)")]
    AmbiguousTarget { target: String, matches: usize },

    #[error("No file found matching {target}")]
    TargetNotFound { target: String },

    #[error("Unable to parse file {target}")]
    UnreadableTarget { target: String },

    #[error("Unable to determine what to pull: {reason}")]
    UnclassifiableMember { reason: String },

    #[error("Unsupported pull: {reason}")]
    UnsupportedPull { reason: String },

    #[error("Unable to find the full body of {member}")]
    UnbalancedBody { member: String },

    #[error("Persist failure during {side} of {target}")]
    Persist { side: PersistSide, target: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for convenience
pub type PullResult<T> = Result<T, PullError>;

/// Standardized error codes, one per taxonomy entry
pub mod error_codes {
    /// Namespace or class name missing from the source
    pub const E2001_STRUCTURE_NOT_FOUND: &str = "E2001";
    /// More than one file matches the target name
    pub const E2002_AMBIGUOUS_TARGET: &str = "E2002";
    /// No file matches the target name
    pub const E2003_TARGET_NOT_FOUND: &str = "E2003";
    /// Target file read returned no content
    pub const E2004_UNREADABLE_TARGET: &str = "E2004";
    /// Member under the cursor could not be classified
    pub const E2005_UNCLASSIFIABLE_MEMBER: &str = "E2005";
    /// Policy violation (protected to interface, method to base class)
    pub const E2006_UNSUPPORTED_PULL: &str = "E2006";
    /// Brace or semicolon invariant failed while extracting a body
    pub const E2007_UNBALANCED_BODY: &str = "E2007";
    /// Target write or source cleanup failed
    pub const E2008_PERSIST_FAILURE: &str = "E2008";
    /// Invalid request parameters
    pub const E2009_INVALID_REQUEST: &str = "E2009";
    /// Configuration could not be loaded or validated
    pub const E2010_CONFIG: &str = "E2010";
    /// Underlying I/O failure
    pub const E2011_IO: &str = "E2011";
}

impl PullError {
    /// Create a new structure-not-found error (`"namespace"`, `"class name"`)
    pub fn structure_not_found(what: impl Into<String>) -> Self {
        Self::StructureNotFound { what: what.into() }
    }

    /// Create a new ambiguous target error
    pub fn ambiguous_target(target: impl Into<String>, matches: usize) -> Self {
        Self::AmbiguousTarget {
            target: target.into(),
            matches,
        }
    }

    /// Create a new target-not-found error
    pub fn target_not_found(target: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target: target.into(),
        }
    }

    /// Create a new unreadable target error
    pub fn unreadable_target(target: impl Into<String>) -> Self {
        Self::UnreadableTarget {
            target: target.into(),
        }
    }

    /// Create a new unclassifiable member error
    pub fn unclassifiable_member(reason: impl Into<String>) -> Self {
        Self::UnclassifiableMember {
            reason: reason.into(),
        }
    }

    /// Create a new unsupported pull error
    pub fn unsupported_pull(reason: impl Into<String>) -> Self {
        Self::UnsupportedPull {
            reason: reason.into(),
        }
    }

    /// Create a new unbalanced body error
    pub fn unbalanced_body(member: impl Into<String>) -> Self {
        Self::UnbalancedBody {
            member: member.into(),
        }
    }

    /// Create a new persist failure
    pub fn persist(side: PersistSide, target: impl Into<String>) -> Self {
        Self::Persist {
            side,
            target: target.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error attached to a path
    pub fn io_at(err: std::io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        use error_codes::*;

        match self {
            PullError::StructureNotFound { .. } => E2001_STRUCTURE_NOT_FOUND,
            PullError::AmbiguousTarget { .. } => E2002_AMBIGUOUS_TARGET,
            PullError::TargetNotFound { .. } => E2003_TARGET_NOT_FOUND,
            PullError::UnreadableTarget { .. } => E2004_UNREADABLE_TARGET,
            PullError::UnclassifiableMember { .. } => E2005_UNCLASSIFIABLE_MEMBER,
            PullError::UnsupportedPull { .. } => E2006_UNSUPPORTED_PULL,
            PullError::UnbalancedBody { .. } => E2007_UNBALANCED_BODY,
            PullError::Persist { .. } => E2008_PERSIST_FAILURE,
            PullError::InvalidRequest { .. } => E2009_INVALID_REQUEST,
            PullError::Config { .. } => E2010_CONFIG,
            PullError::Io { .. } => E2011_IO,
        }
    }

    /// Message shown to the user by the host, including the manual fallback
    pub fn user_message(&self) -> String {
        match self {
            PullError::StructureNotFound { .. } => self.to_string(),
            PullError::AmbiguousTarget { target, .. } => {
                format!("More then one file found matching {}. Please copy manually", target)
            }
            PullError::TargetNotFound { target } => {
                format!("No file found matching {}. Please copy manually", target)
            }
            PullError::UnreadableTarget { target } => {
                format!("Unable to parse file {}. Please copy manually", target)
            }
            PullError::UnclassifiableMember { .. } => "Unsupported pull. Unable to determine what to pull. \
                 'public' properties and 'public' or 'protected' methods are only supported. \
                 Please copy manually"
                .to_string(),
            PullError::UnsupportedPull { reason } => {
                format!("Unsupported pull. {}. Please copy manually", reason)
            }
            PullError::UnbalancedBody { member } => {
                format!("Unable to find the full body of {}. Please copy manually", member)
            }
            PullError::Persist {
                side: PersistSide::Target,
                target,
            } => format!("Unable to update {}. Please copy manually", target),
            PullError::Persist {
                side: PersistSide::SourceCleanup,
                target,
            } => format!("Unable to remove {}. Please remove manually", target),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for PullError {
    fn from(err: std::io::Error) -> Self {
        PullError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PullError {
    fn from(err: serde_json::Error) -> Self {
        PullError::InvalidRequest {
            message: format!("JSON error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_helpers() {
        match PullError::ambiguous_target("IMyClass", 2) {
            PullError::AmbiguousTarget { target, matches } => {
                assert_eq!(target, "IMyClass");
                assert_eq!(matches, 2);
            }
            _ => panic!("Expected ambiguous target error"),
        }

        match PullError::persist(PersistSide::SourceCleanup, "MyClass.cs") {
            PullError::Persist { side, .. } => assert_eq!(side, PersistSide::SourceCleanup),
            _ => panic!("Expected persist error"),
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            PullError::structure_not_found("namespace"),
            PullError::ambiguous_target("A", 2),
            PullError::target_not_found("A"),
            PullError::unreadable_target("A"),
            PullError::unclassifiable_member("x"),
            PullError::unsupported_pull("x"),
            PullError::unbalanced_body("x"),
            PullError::persist(PersistSide::Target, "A"),
            PullError::invalid_request("x"),
            PullError::config("x"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_user_messages_name_the_failing_side() {
        let target = PullError::persist(PersistSide::Target, "BaseClass");
        assert_eq!(
            target.user_message(),
            "Unable to update BaseClass. Please copy manually"
        );

        let cleanup = PullError::persist(PersistSide::SourceCleanup, "MyClass");
        assert!(cleanup.user_message().contains("Please remove manually"));

        let ns = PullError::structure_not_found("namespace");
        assert_eq!(ns.user_message(), "Could not find the namespace.");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = PullError::io_at(io, "IMyClass.cs");
        assert!(err.source().is_some());
        assert_eq!(err.code(), error_codes::E2011_IO);
    }
}
