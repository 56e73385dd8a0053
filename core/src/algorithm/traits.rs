//! Core trait definitions for traced sorting algorithms
//!
//! Every sorting variant is a stateless generator that turns an input array
//! into the ordered list of [`Step`]s describing its execution. Generators
//! share no mutable state, so one instance can serve any number of traces.
//!
//! # Key Design Principles
//! - Generation is pure and total over any finite input
//! - Input arrays are borrowed, never mutated
//! - Pseudocode listings are fixed per algorithm; steps index into them
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::state::{Step, Value};
use crate::algorithm::SortAlgorithm;

/// Asymptotic complexity summary shown alongside a visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub best_case: &'static str,
    pub average_case: &'static str,
    pub worst_case: &'static str,
    pub space_complexity: &'static str,
    pub stable: bool,
}

/// Unknown algorithm name passed to [`SortAlgorithm::from_str`](std::str::FromStr)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting algorithm '{0}' (expected bubble, insertion, selection or merge)")]
pub struct ParseAlgorithmError(pub String);

/// Step-trace generator for one sorting algorithm
///
/// # Invariants
/// - The returned list is never empty
/// - The first step is an undecorated copy of `input`
/// - The last step, and only the last, has `done` set and covers every index
/// - Every step holds a permutation of `input`
/// - `sorted` never shrinks from one step to the next
pub trait TraceGenerator: Debug + Send + Sync {
    /// Algorithm this generator simulates
    fn algorithm(&self) -> SortAlgorithm;

    /// Fixed pseudocode listing that `highlighted_lines` index into
    fn pseudocode(&self) -> &'static [&'static str];

    /// Complexity summary for display
    fn complexity(&self) -> AlgorithmComplexity;

    /// Simulates the algorithm over `input`
    fn generate(&self, input: &[Value]) -> Vec<Step>;
}
