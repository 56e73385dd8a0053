//! Immutable step snapshots for sorting traces
//!
//! A [`Step`] captures the complete array state at one instant of a simulated
//! sort together with the indices the algorithm is currently touching and the
//! pseudocode lines that produced it. Steps are value types: once recorded
//! they are never mutated, so a trace can be shared freely between the
//! playback controller and the renderer.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type of the arrays being sorted
pub type Value = i64;

/// Ordered set of array indices
pub type IndexSet = BTreeSet<usize>;

/// Set of highlighted line indices into an algorithm's pseudocode listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeLines(BTreeSet<usize>);

impl CodeLines {
    /// No highlighted lines
    pub fn none() -> Self {
        Self::default()
    }

    /// Highlight the given lines
    pub fn from_lines(lines: &[usize]) -> Self {
        Self(lines.iter().copied().collect())
    }

    pub fn contains(&self, line: usize) -> bool {
        self.0.contains(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Highest highlighted line, if any
    pub fn last(&self) -> Option<usize> {
        self.0.iter().next_back().copied()
    }
}

impl FromIterator<usize> for CodeLines {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CodeLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(|line| line.to_string()).collect();
        write!(f, "{{{}}}", lines.join(", "))
    }
}

/// One immutable snapshot of a sorting algorithm's execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Full array state at this instant
    pub array: Vec<Value>,

    /// Indices currently being compared (at most two)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub comparing: IndexSet,

    /// Indices just exchanged (at most two)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub swapped: IndexSet,

    /// Indices already settled; never shrinks within a trace
    #[serde(default)]
    pub sorted: IndexSet,

    /// Outer pass that finished at this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_completed: Option<usize>,

    /// Set only on the terminal step
    #[serde(default)]
    pub done: bool,

    /// Pseudocode lines that produced this step
    #[serde(default)]
    pub highlighted_lines: CodeLines,
}

impl Step {
    /// Undecorated snapshot of `array`
    pub fn snapshot(array: &[Value]) -> Self {
        Self {
            array: array.to_vec(),
            comparing: IndexSet::new(),
            swapped: IndexSet::new(),
            sorted: IndexSet::new(),
            pass_completed: None,
            done: false,
            highlighted_lines: CodeLines::none(),
        }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Whether `index` is settled, either explicitly or because the trace ended
    pub fn is_sorted_at(&self, index: usize) -> bool {
        self.done || self.sorted.contains(&index)
    }

    /// Largest value in the array, `None` when empty
    pub fn max_value(&self) -> Option<Value> {
        self.array.iter().copied().max()
    }
}
