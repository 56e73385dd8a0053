//! Trace validation
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod correctness;

pub use self::correctness::{is_non_decreasing, validate_trace, TraceMetrics, TraceViolation};
