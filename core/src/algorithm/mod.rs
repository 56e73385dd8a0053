//! SortScope Algorithm Framework
//! Step-traced comparison sorts selected through a fixed enumeration
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod sorting;
pub mod state;
pub mod traits;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

pub use self::sorting::{BubbleSort, InsertionSort, MergeSort, SelectionSort};
pub use self::state::{CodeLines, IndexSet, Step, Value};
pub use self::traits::{AlgorithmComplexity, ParseAlgorithmError, TraceGenerator};

use crate::execution::history::Trace;

/// The visualizable sorting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    #[default]
    Bubble,
    Insertion,
    Selection,
    Merge,
}

impl SortAlgorithm {
    /// All variants in tab order
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
        SortAlgorithm::Selection,
        SortAlgorithm::Merge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Selection => "selection",
            SortAlgorithm::Merge => "merge",
        }
    }

    /// Human-readable tab title
    pub fn title(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "Bubble Sort",
            SortAlgorithm::Insertion => "Insertion Sort",
            SortAlgorithm::Selection => "Selection Sort",
            SortAlgorithm::Merge => "Merge Sort",
        }
    }

    pub fn generator(self) -> &'static dyn TraceGenerator {
        match self {
            SortAlgorithm::Bubble => &BubbleSort,
            SortAlgorithm::Insertion => &InsertionSort,
            SortAlgorithm::Selection => &SelectionSort,
            SortAlgorithm::Merge => &MergeSort,
        }
    }

    pub fn pseudocode(self) -> &'static [&'static str] {
        self.generator().pseudocode()
    }

    pub fn complexity(self) -> AlgorithmComplexity {
        self.generator().complexity()
    }

    /// Simulates this algorithm over `input` into an immutable trace
    pub fn generate(self, input: Arc<[Value]>) -> Trace {
        let steps = self.generator().generate(&input);
        debug!("Generated {} trace: {} steps for {} values", self, steps.len(), input.len());
        Trace::new(self, input, steps)
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let name = normalized
            .strip_suffix("sort")
            .unwrap_or(normalized.as_str())
            .trim_end_matches(&['-', '_', ' '][..]);
        SortAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("bubble".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Bubble);
        assert_eq!("Merge Sort".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Merge);
        assert_eq!("selection-sort".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Selection);
        assert_eq!(" insertion ".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Insertion);
        assert!("quick".parse::<SortAlgorithm>().is_err());
    }

    #[test]
    fn test_generators_report_their_algorithm() {
        for algorithm in SortAlgorithm::ALL {
            assert_eq!(algorithm.generator().algorithm(), algorithm);
            assert!(!algorithm.pseudocode().is_empty());
        }
    }

    #[test]
    fn test_highlighted_lines_stay_inside_listing() {
        let input: Arc<[Value]> = Arc::from(vec![5, 1, 8, 4, 2, 7, 3, 6]);
        for algorithm in SortAlgorithm::ALL {
            let listing = algorithm.pseudocode().len();
            let trace = algorithm.generate(input.clone());
            for step in trace.steps() {
                assert!(step.highlighted_lines.iter().all(|line| line < listing), "{algorithm}");
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SortAlgorithm::Selection).unwrap();
        assert_eq!(json, "\"selection\"");
    }
}
