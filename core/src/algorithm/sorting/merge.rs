//! Top-down merge sort with in-place rotation merges
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::{Step, Value};
use crate::algorithm::traits::{AlgorithmComplexity, TraceGenerator};
use crate::algorithm::SortAlgorithm;
use crate::execution::tracer::TraceRecorder;

const PSEUDOCODE: &[&str] = &[
    "function mergeSort(arr, lo, hi):",
    "  if lo >= hi: return",
    "  mid = floor((lo + hi) / 2)",
    "  mergeSort(arr, lo, mid)",
    "  mergeSort(arr, mid + 1, hi)",
    "  merge(arr, lo, mid, hi)",
    "  return arr",
    "function merge(arr, lo, mid, hi):",
    "  i = lo, j = mid + 1",
    "  while i <= mid and j <= hi:",
    "    if arr[i] > arr[j]:",
    "      move arr[j] to position i",
    "      mid = mid + 1, j = j + 1",
    "    i = i + 1",
];

const SIGNATURE: &[usize] = &[0];
const SPLIT: &[usize] = &[1, 2];
const MERGE_CALL: &[usize] = &[5];
const RETURN: &[usize] = &[6];
const MERGE_INIT: &[usize] = &[7, 8];
const COMPARE: &[usize] = &[9, 10];
const MOVE: &[usize] = &[11, 12];

/// Recursively sorts both halves, then merges them in place.
///
/// Merging rotates the smaller right-hand element into position instead of
/// copying through an auxiliary buffer, so every snapshot remains a
/// permutation of the input. The strict `>` keeps equal elements in their
/// original order, which makes the trace stable and reproducible. Slots join
/// `sorted` only during the outermost merge, where each placement is final.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort;

impl TraceGenerator for MergeSort {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Merge
    }

    fn pseudocode(&self) -> &'static [&'static str] {
        PSEUDOCODE
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            best_case: "O(n log n)",
            average_case: "O(n log n)",
            worst_case: "O(n log n)",
            space_complexity: "O(log n)",
            stable: true,
        }
    }

    fn generate(&self, input: &[Value]) -> Vec<Step> {
        let mut recorder = TraceRecorder::new(input, SIGNATURE);
        let n = recorder.len();
        if n > 1 {
            let mut merger = Merger {
                recorder: &mut recorder,
                last: n - 1,
                merges: 0,
            };
            merger.sort(0, n - 1);
        }
        recorder.finish(RETURN)
    }
}

struct Merger<'a> {
    recorder: &'a mut TraceRecorder,
    last: usize,
    merges: usize,
}

impl Merger<'_> {
    fn sort(&mut self, lo: usize, hi: usize) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        self.recorder.mark(SPLIT);
        self.sort(lo, mid);
        self.sort(mid + 1, hi);
        self.merge(lo, mid, hi);
    }

    fn merge(&mut self, lo: usize, mut mid: usize, hi: usize) {
        let outermost = lo == 0 && hi == self.last;
        self.recorder.mark(MERGE_INIT);

        let (mut i, mut j) = (lo, mid + 1);
        while i <= mid && j <= hi {
            self.recorder.compare(&[i, j], COMPARE);
            if self.recorder.value(i) > self.recorder.value(j) {
                self.recorder.rotate_into(i, j, MOVE);
                mid += 1;
                j += 1;
            }
            if outermost {
                self.recorder.settle([i]);
            }
            i += 1;
        }

        if outermost {
            self.recorder.settle(i..=hi);
        }
        self.recorder.pass_completed(self.merges, MERGE_CALL);
        self.merges += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::CodeLines;

    #[test]
    fn test_sorts_reference_input() {
        let steps = MergeSort.generate(&[5, 1, 8, 4, 2, 7, 3, 6]);
        assert_eq!(steps.last().unwrap().array, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        // n - 1 merges for n leaves
        let merges = steps.iter().filter(|s| s.pass_completed.is_some()).count();
        assert_eq!(merges, 7);
    }

    #[test]
    fn test_moves_mark_both_endpoints() {
        let steps = MergeSort.generate(&[2, 3, 1]);
        let moved = steps.iter().find(|s| !s.swapped.is_empty()).unwrap();
        // [2,3] merged with [1]: 1 moves from slot 2 to slot 0
        assert_eq!(moved.swapped, [0, 2].into_iter().collect());
        assert_eq!(moved.array, vec![1, 2, 3]);
    }

    #[test]
    fn test_only_outermost_merge_settles() {
        let steps = MergeSort.generate(&[4, 3, 2, 1]);
        let first_merge = steps.iter().find(|s| s.pass_completed == Some(0)).unwrap();
        assert!(first_merge.sorted.is_empty());
        let before_last = &steps[steps.len() - 2];
        assert_eq!(before_last.sorted.len(), 4);
    }

    #[test]
    fn test_finishes_on_return_line() {
        for input in [&[][..], &[7][..], &[3, 1, 2][..]] {
            let steps = MergeSort.generate(input);
            let last = steps.last().unwrap();
            assert_eq!(last.highlighted_lines, CodeLines::from_lines(RETURN));
            assert_eq!(PSEUDOCODE[RETURN[0]].trim(), "return arr");
        }
    }

    #[test]
    fn test_equal_values_are_not_moved() {
        let steps = MergeSort.generate(&[3, 3, 3]);
        assert!(steps.iter().all(|s| s.swapped.is_empty()));
        assert!(steps.last().unwrap().done);
    }
}
