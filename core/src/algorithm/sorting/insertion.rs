//! Insertion sort by adjacent exchanges
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::{Step, Value};
use crate::algorithm::traits::{AlgorithmComplexity, TraceGenerator};
use crate::algorithm::SortAlgorithm;
use crate::execution::tracer::TraceRecorder;

const PSEUDOCODE: &[&str] = &[
    "function insertionSort(arr):",
    "  for i from 1 to n - 1:",
    "    j = i",
    "    while j > 0 and arr[j - 1] > arr[j]:",
    "      swap(arr[j - 1], arr[j])",
    "      j = j - 1",
    "  return arr",
];

const SIGNATURE: &[usize] = &[0];
const OUTER_LOOP: &[usize] = &[1];
const INIT_CURSOR: &[usize] = &[2];
const COMPARE: &[usize] = &[3];
const SWAP: &[usize] = &[4, 5];
const RETURN: &[usize] = &[6];

/// Grows a sorted prefix one element at a time, sinking each new element
/// left through adjacent exchanges so every snapshot stays a permutation.
///
/// The `sorted` set tracks the ordered prefix; those slots are ordered
/// relative to each other but may still shift right when a smaller element
/// arrives later.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl TraceGenerator for InsertionSort {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Insertion
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
        if n < 2 {
            return recorder.finish(RETURN);
        }

        recorder.settle([0]);
        for i in 1..n {
            recorder.mark(OUTER_LOOP);
            recorder.mark(INIT_CURSOR);

            let mut j = i;
            while j > 0 {
                recorder.compare(&[j - 1, j], COMPARE);
                if recorder.value(j - 1) <= recorder.value(j) {
                    break;
                }
                recorder.swap(j - 1, j, SWAP);
                j -= 1;
            }

            recorder.settle([i]);
            recorder.pass_completed(i - 1, OUTER_LOOP);
        }

        recorder.finish(RETURN)
    }
}
