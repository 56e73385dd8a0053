//! Temporal navigation over recorded traces
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod playback;

pub use self::playback::{PlaybackConfig, PlaybackController, PlaybackPhase, PlaybackState};
