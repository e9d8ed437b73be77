pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    list_targets, resolve_transitive_interfaces, CommandRegistry, FsHost, PullOutcome,
    PullService, TargetListing,
};
