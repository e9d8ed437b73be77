//! Test support utilities and fixtures for pullto tests

pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use helpers::{create_test_config, SampleWorkspace};
pub use mocks::MockWorkspaceHost;
