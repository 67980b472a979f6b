//! Shared utilities for mapnote.
//!
//! This crate provides common utilities used across the mapnote workspace:
//! - Logging setup with tracing
//! - Lexical path helpers for resolving map resources against a store directory

pub mod log;
pub mod path;

pub use log::{LogConfig, LogLevel};
