//! Selection sort
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::{Step, Value};
use crate::algorithm::traits::{AlgorithmComplexity, TraceGenerator};
use crate::algorithm::SortAlgorithm;
use crate::execution::tracer::TraceRecorder;

const PSEUDOCODE: &[&str] = &[
    "function selectionSort(arr):",
    "  for i from 0 to n - 2:",
    "    minIndex = i",
    "    for j from i + 1 to n - 1:",
    "      if arr[j] < arr[minIndex]:",
    "        minIndex = j",
    "    if minIndex != i:",
    "      swap(arr[i], arr[minIndex])",
    "  return arr",
];

const SIGNATURE: &[usize] = &[0];
const OUTER_LOOP: &[usize] = &[1];
const INIT_MIN: &[usize] = &[2];
const COMPARE: &[usize] = &[3, 4];
const NEW_MIN: &[usize] = &[5];
const SWAP_CHECK: &[usize] = &[6];
const SWAP: &[usize] = &[7];
const RETURN: &[usize] = &[8];

/// Scans the unsorted suffix for its minimum and exchanges it into place.
/// Slot `i` is final after pass `i`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSort;

impl TraceGenerator for SelectionSort {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Selection
    }

    fn pseudocode(&self) -> &'static [&'static str] {
        PSEUDOCODE
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            best_case: "O(n²)",
            average_case: "O(n²)",
            worst_case: "O(n²)",
            space_complexity: "O(1)",
            stable: false,
        }
    }

    fn generate(&self, input: &[Value]) -> Vec<Step> {
        let mut recorder = TraceRecorder::new(input, SIGNATURE);
        let n = recorder.len();

        for i in 0..n.saturating_sub(1) {
            recorder.mark(OUTER_LOOP);
            recorder.compare(&[i], INIT_MIN);

            let mut min_index = i;
            for j in i + 1..n {
                recorder.compare(&[min_index, j], COMPARE);
                if recorder.value(j) < recorder.value(min_index) {
                    min_index = j;
                    recorder.compare(&[j], NEW_MIN);
                }
            }

            recorder.mark(SWAP_CHECK);
            if min_index != i {
                recorder.swap(i, min_index, SWAP);
            }
            recorder.settle([i]);
            recorder.pass_completed(i, OUTER_LOOP);
        }

        recorder.finish(RETURN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_exchange_per_pass_at_most() {
        let steps = SelectionSort.generate(&[5, 1, 8, 4, 2, 7, 3, 6]);
        let swaps = steps.iter().filter(|s| !s.swapped.is_empty()).count();
        assert!(swaps <= 7);
        assert_eq!(steps.last().unwrap().array, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_slot_is_final_after_its_pass() {
        let steps = SelectionSort.generate(&[3, 1, 2]);
        let first_pass = steps.iter().find(|s| s.pass_completed == Some(0)).unwrap();
        assert_eq!(first_pass.array[0], 1);
        assert!(first_pass.sorted.contains(&0));
        assert!(!first_pass.sorted.contains(&1));
    }

    #[test]
    fn test_new_minimum_is_highlighted_alone() {
        let steps = SelectionSort.generate(&[2, 1]);
        let new_min = steps.iter().find(|s| s.highlighted_lines.contains(5)).unwrap();
        assert_eq!(new_min.comparing, [1].into_iter().collect());
    }
}
