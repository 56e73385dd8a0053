//! Trace recording and storage
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod history;
pub mod tracer;

pub use self::history::{Trace, TraceCache};
pub use self::tracer::TraceRecorder;
