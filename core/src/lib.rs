//! SortScope core
//!
//! Deterministic step-trace generation for comparison sorts and the playback
//! state machine that walks those traces. Everything here is free of
//! rendering concerns: a trace is plain data, and the playback controller
//! exposes its timer as a deadline for the caller's event loop.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod execution;
pub mod input;
pub mod temporal;
pub mod validation;

pub use crate::algorithm::{
    AlgorithmComplexity, CodeLines, IndexSet, ParseAlgorithmError, SortAlgorithm, Step,
    TraceGenerator, Value,
};
pub use crate::execution::{Trace, TraceCache};
pub use crate::input::{parse_values, InputError};
pub use crate::temporal::{PlaybackConfig, PlaybackController, PlaybackPhase, PlaybackState};
pub use crate::validation::{validate_trace, TraceMetrics, TraceViolation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
