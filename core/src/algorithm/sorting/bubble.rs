//! Bubble sort with early termination
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::{Step, Value};
use crate::algorithm::traits::{AlgorithmComplexity, TraceGenerator};
use crate::algorithm::SortAlgorithm;
use crate::execution::tracer::TraceRecorder;

const PSEUDOCODE: &[&str] = &[
    "function bubbleSort(arr):",
    "  n = length(arr)",
    "  for i from 0 to n - 2:",
    "    swapped = false",
    "    for j from 0 to n - i - 2:",
    "      if arr[j] > arr[j + 1]:",
    "        swap(arr[j], arr[j + 1])",
    "        swapped = true",
    "    if not swapped:",
    "      break",
    "  return arr",
];

const SIGNATURE: &[usize] = &[0, 1];
const OUTER_LOOP: &[usize] = &[2];
const RESET_FLAG: &[usize] = &[3];
const INNER_LOOP: &[usize] = &[4];
const COMPARE: &[usize] = &[5];
const SWAP: &[usize] = &[6, 7];
const EARLY_EXIT_CHECK: &[usize] = &[8];
const EARLY_EXIT: &[usize] = &[9];
const RETURN: &[usize] = &[10];

/// Repeatedly bubbles the largest unsettled value to the end of the array.
/// A pass without swaps proves the remainder is ordered and ends the sort.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl TraceGenerator for BubbleSort {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Bubble
    }

    fn pseudocode(&self) -> &'static [&'static str] {
        PSEUDOCODE
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            best_case: "O(n)",
            average_case: "O(n²)",
            worst_case: "O(n²)",
            space_complexity: "O(1)",
            stable: true,
        }
    }

    fn generate(&self, input: &[Value]) -> Vec<Step> {
        let mut recorder = TraceRecorder::new(input, SIGNATURE);
        let n = recorder.len();

        for i in 0..n.saturating_sub(1) {
            recorder.mark(OUTER_LOOP);
            recorder.mark(RESET_FLAG);

            let mut swapped = false;
            for j in 0..n - i - 1 {
                recorder.mark(INNER_LOOP);
                recorder.compare(&[j, j + 1], COMPARE);
                if recorder.value(j) > recorder.value(j + 1) {
                    recorder.swap(j, j + 1, SWAP);
                    swapped = true;
                }
            }

            recorder.mark(EARLY_EXIT_CHECK);
            recorder.settle([n - 1 - i]);
            if !swapped {
                recorder.mark(EARLY_EXIT);
                break;
            }
            recorder.pass_completed(i, OUTER_LOOP);
        }

        recorder.finish(RETURN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::IndexSet;

    fn set(indices: &[usize]) -> IndexSet {
        indices.iter().copied().collect()
    }

    #[test]
    fn test_reference_scenario() {
        let input = [5, 1, 8, 4, 2, 7, 3, 6];
        let steps = BubbleSort.generate(&input);

        assert_eq!(steps[0].array, input.to_vec());
        assert_eq!(steps[0].highlighted_lines.iter().collect::<Vec<_>>(), vec![0, 1]);

        let first_compare = steps
            .iter()
            .position(|step| step.comparing == set(&[0, 1]))
            .expect("first pair is compared");
        let after = &steps[first_compare + 1];
        assert_eq!(after.swapped, set(&[0, 1]));
        assert!(after.comparing.is_empty());
        assert_eq!(&after.array[..2], &[1, 5]);

        let last = steps.last().unwrap();
        assert!(last.done);
        assert_eq!(last.array, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(last.sorted, (0..8).collect());
    }

    #[test]
    fn test_sorted_input_stops_after_one_pass() {
        let steps = BubbleSort.generate(&[1, 2, 3, 4]);

        assert!(steps.iter().all(|step| step.swapped.is_empty()));
        assert!(steps.iter().all(|step| step.pass_completed.is_none()));
        let outer_entries = steps
            .iter()
            .filter(|step| step.highlighted_lines.iter().eq(OUTER_LOOP.iter().copied()))
            .count();
        assert_eq!(outer_entries, 1);

        let early_exit = &steps[steps.len() - 2];
        assert!(early_exit.highlighted_lines.contains(9));
        assert_eq!(early_exit.sorted, set(&[3]));
    }

    #[test]
    fn test_pass_boundaries_extend_sorted_suffix() {
        let steps = BubbleSort.generate(&[3, 2, 1]);
        let passes: Vec<&Step> = steps.iter().filter(|s| s.pass_completed.is_some()).collect();

        assert_eq!(passes[0].pass_completed, Some(0));
        assert_eq!(passes[0].sorted, set(&[2]));
        assert_eq!(passes[1].pass_completed, Some(1));
        assert_eq!(passes[1].sorted, set(&[1, 2]));
    }

    #[test]
    fn test_equal_values_never_swap() {
        let steps = BubbleSort.generate(&[3, 3, 3]);
        assert!(steps.iter().all(|step| step.swapped.is_empty()));
        assert!(steps.last().unwrap().done);
    }

    #[test]
    fn test_degenerate_inputs() {
        for input in [&[][..], &[42][..]] {
            let steps = BubbleSort.generate(input);
            assert_eq!(steps.len(), 2);
            assert!(steps[1].done);
            assert_eq!(steps[1].sorted.len(), input.len());
            assert!(steps.iter().all(|s| s.comparing.is_empty() && s.swapped.is_empty()));
        }
    }
}
