//! Shared utilities for chartdesk
//!
//! This crate provides the process-level plumbing used across the chartdesk
//! workspace: tracing subscriber setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::{LogConfig, LogFormat, LoggingError, init_tracing};
