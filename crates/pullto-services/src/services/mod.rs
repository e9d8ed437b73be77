//! Services coordinating one pull invocation against a workspace host

pub mod fs_host;
pub mod pull_service;
pub mod registry;
pub mod targets;

pub use fs_host::FsHost;
pub use pull_service::{PullOutcome, PullService};
pub use registry::CommandRegistry;
pub use targets::{find_single_file, list_targets, resolve_transitive_interfaces, TargetListing};
