//! Configuration management for pullto
//!
//! - [`config`] - `AppConfig` and its layered loading
//! - [`logging`] - tracing subscriber initialization

pub mod config;
pub mod logging;

pub use config::{AppConfig, EditorConfig, LineEndingSetting, LogFormat, LoggingConfig, PullConfig};
