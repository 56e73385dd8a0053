//! Immutable execution traces and their memoization
//!
//! A [`Trace`] is the complete ordered list of steps for one
//! (input, algorithm) pair. It is generated once and then shared read-only
//! between the playback controller and the renderer through cheap `Arc`
//! clones. [`TraceCache`] keeps the most recent trace and hands it back as
//! long as neither the algorithm nor the identity of the input array
//! changes.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::algorithm::state::{Step, Value};
use crate::algorithm::SortAlgorithm;

/// Complete, immutable step sequence for one input and one algorithm
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    algorithm: SortAlgorithm,
    input: Arc<[Value]>,
    steps: Arc<[Step]>,
}

impl Trace {
    pub(crate) fn new(algorithm: SortAlgorithm, input: Arc<[Value]>, steps: Vec<Step>) -> Self {
        debug_assert!(!steps.is_empty(), "a trace always holds at least two steps");
        Self {
            algorithm,
            input,
            steps: steps.into(),
        }
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    /// Input the trace was generated from
    pub fn input(&self) -> &Arc<[Value]> {
        &self.input
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps in the trace
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the terminal step
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Undecorated first step
    pub fn initial(&self) -> &Step {
        &self.steps[0]
    }

    /// Terminal step with `done` set
    pub fn terminal(&self) -> &Step {
        &self.steps[self.last_index()]
    }

    /// Array state after the simulated sort
    pub fn final_array(&self) -> &[Value] {
        &self.terminal().array
    }

    /// Serializes the trace as JSON for export
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Referential memo over the latest trace
///
/// Arrays are treated as immutable once set, so identity (`Arc::ptr_eq`)
/// stands in for value equality: a new `Arc` always regenerates, even if
/// its contents match the previous one.
#[derive(Debug, Default)]
pub struct TraceCache {
    cached: Option<Arc<Trace>>,
    generated: usize,
}

impl TraceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached trace for (`algorithm`, `input`), generating it on
    /// a miss
    pub fn get_or_generate(&mut self, algorithm: SortAlgorithm, input: &Arc<[Value]>) -> Arc<Trace> {
        if let Some(trace) = &self.cached {
            if trace.algorithm == algorithm && Arc::ptr_eq(&trace.input, input) {
                return Arc::clone(trace);
            }
        }

        let trace = Arc::new(algorithm.generate(Arc::clone(input)));
        self.generated += 1;
        debug!("Trace cache miss for {}: {} traces generated", algorithm, self.generated);
        self.cached = Some(Arc::clone(&trace));
        trace
    }

    /// Number of traces generated over the cache's lifetime
    pub fn generated(&self) -> usize {
        self.generated
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}
