//! Viewer perspective over a running trace
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod synchronization;

pub use self::synchronization::{run_viewer, ConfigError, ViewerCommand, ViewerConfig};
