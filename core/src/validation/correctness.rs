//! Trace correctness verification
//!
//! Checks a generated trace against the invariants every visualization relies
//! on: a non-empty sequence that starts from the untouched input, holds a
//! permutation of the input at every step, never un-settles an index, and
//! ends in exactly one terminal step whose array is in non-decreasing order.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::Serialize;
use thiserror::Error;

use crate::algorithm::state::{Step, Value};
use crate::execution::history::Trace;

/// First invariant a trace breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceViolation {
    #[error("trace is empty")]
    Empty,

    #[error("first step does not show the untouched input")]
    InitialMismatch,

    #[error("step {0} is not a permutation of the input")]
    NotPermutation(usize),

    #[error("step {0} drops an index from the sorted set")]
    SortedShrank(usize),

    #[error("step {step} marks {count} indices as {field}; at most two allowed")]
    TooManyMarked { step: usize, field: &'static str, count: usize },

    #[error("step {step} references index {index} outside the array")]
    IndexOutOfRange { step: usize, index: usize },

    #[error("step {0} is marked done before the end of the trace")]
    PrematureDone(usize),

    #[error("last step is not marked done")]
    MissingTerminal,

    #[error("terminal step does not cover every index")]
    TerminalIncomplete,

    #[error("final array is not in non-decreasing order")]
    NotOrdered,
}

/// Operation counts gathered while validating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceMetrics {
    pub steps: usize,
    pub comparisons: usize,
    pub swaps: usize,
    pub passes: usize,
}

/// Whether `values` is in non-decreasing order
pub fn is_non_decreasing(values: &[Value]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Verifies every trace invariant, returning operation counts on success
pub fn validate_trace(trace: &Trace) -> Result<TraceMetrics, TraceViolation> {
    let steps = trace.steps();
    let first = steps.first().ok_or(TraceViolation::Empty)?;

    if first.array.as_slice() != &trace.input()[..]
        || !first.comparing.is_empty()
        || !first.swapped.is_empty()
        || !first.sorted.is_empty()
    {
        return Err(TraceViolation::InitialMismatch);
    }

    let mut reference = trace.input().to_vec();
    reference.sort_unstable();

    let mut metrics = TraceMetrics {
        steps: steps.len(),
        ..TraceMetrics::default()
    };
    let last = steps.len() - 1;

    for (index, step) in steps.iter().enumerate() {
        check_permutation(index, step, &reference)?;
        check_marked(index, step)?;

        if index > 0 && !steps[index - 1].sorted.is_subset(&step.sorted) {
            return Err(TraceViolation::SortedShrank(index));
        }
        if step.done && index != last {
            return Err(TraceViolation::PrematureDone(index));
        }

        if step.comparing.len() == 2 {
            metrics.comparisons += 1;
        }
        if !step.swapped.is_empty() {
            metrics.swaps += 1;
        }
        if step.pass_completed.is_some() {
            metrics.passes += 1;
        }
    }

    let terminal = &steps[last];
    if !terminal.done {
        return Err(TraceViolation::MissingTerminal);
    }
    if terminal.sorted.len() != terminal.array.len() {
        return Err(TraceViolation::TerminalIncomplete);
    }
    if !is_non_decreasing(&terminal.array) {
        return Err(TraceViolation::NotOrdered);
    }

    Ok(metrics)
}

fn check_permutation(index: usize, step: &Step, reference: &[Value]) -> Result<(), TraceViolation> {
    let mut values = step.array.clone();
    values.sort_unstable();
    if values != reference {
        return Err(TraceViolation::NotPermutation(index));
    }
    Ok(())
}

fn check_marked(index: usize, step: &Step) -> Result<(), TraceViolation> {
    for (field, set) in [("comparing", &step.comparing), ("swapped", &step.swapped)] {
        if set.len() > 2 {
            return Err(TraceViolation::TooManyMarked {
                step: index,
                field,
                count: set.len(),
            });
        }
    }

    let len = step.array.len();
    let all = step.comparing.iter().chain(&step.swapped).chain(&step.sorted);
    if let Some(&out) = all.into_iter().find(|&&i| i >= len) {
        return Err(TraceViolation::IndexOutOfRange { step: index, index: out });
    }
    Ok(())
}
