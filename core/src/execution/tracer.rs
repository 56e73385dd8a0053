//! Step recorder shared by the sorting generators
//!
//! The recorder owns the working copy of the array and the monotone set of
//! settled indices, and turns each algorithmic event into an immutable
//! [`Step`]. Generators only describe *what* happened; the recorder keeps the
//! trace invariants (permutation, monotone `sorted`, single terminal step).
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::state::{CodeLines, IndexSet, Step, Value};

#[derive(Debug)]
pub struct TraceRecorder {
    working: Vec<Value>,
    sorted: IndexSet,
    steps: Vec<Step>,
}

impl TraceRecorder {
    /// Starts a trace with the untouched input highlighted at `lines`
    pub fn new(input: &[Value], lines: &[usize]) -> Self {
        let mut recorder = Self {
            working: input.to_vec(),
            sorted: IndexSet::new(),
            steps: Vec::new(),
        };
        recorder.mark(lines);
        recorder
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    #[inline]
    pub fn value(&self, index: usize) -> Value {
        self.working[index]
    }

    /// Records a control-flow step with nothing compared or moved
    pub fn mark(&mut self, lines: &[usize]) {
        self.push(IndexSet::new(), IndexSet::new(), None, lines);
    }

    /// Records a comparison between the given indices
    pub fn compare(&mut self, indices: &[usize], lines: &[usize]) {
        self.push(indices.iter().copied().collect(), IndexSet::new(), None, lines);
    }

    /// Exchanges two slots of the working copy and records the result
    pub fn swap(&mut self, a: usize, b: usize, lines: &[usize]) {
        self.working.swap(a, b);
        self.push(IndexSet::new(), [a, b].into_iter().collect(), None, lines);
    }

    /// Moves the element at `from` down to `to`, shifting the slots between
    /// them one place right, and records the move as an exchange of the two
    /// endpoints
    pub fn rotate_into(&mut self, to: usize, from: usize, lines: &[usize]) {
        debug_assert!(to <= from);
        self.working[to..=from].rotate_right(1);
        self.push(IndexSet::new(), [to, from].into_iter().collect(), None, lines);
    }

    /// Adds indices to the settled set; already-settled indices are kept
    pub fn settle<I: IntoIterator<Item = usize>>(&mut self, indices: I) {
        self.sorted.extend(indices);
    }

    /// Records the end of outer pass `pass`
    pub fn pass_completed(&mut self, pass: usize, lines: &[usize]) {
        self.push(IndexSet::new(), IndexSet::new(), Some(pass), lines);
    }

    /// Records the terminal step and returns the finished trace
    pub fn finish(mut self, lines: &[usize]) -> Vec<Step> {
        self.sorted = (0..self.working.len()).collect();
        let mut step = self.snapshot(IndexSet::new(), IndexSet::new(), None, lines);
        step.done = true;
        self.steps.push(step);
        self.steps
    }

    fn push(
        &mut self,
        comparing: IndexSet,
        swapped: IndexSet,
        pass_completed: Option<usize>,
        lines: &[usize],
    ) {
        let step = self.snapshot(comparing, swapped, pass_completed, lines);
        self.steps.push(step);
    }

    fn snapshot(
        &self,
        comparing: IndexSet,
        swapped: IndexSet,
        pass_completed: Option<usize>,
        lines: &[usize],
    ) -> Step {
        Step {
            array: self.working.clone(),
            comparing,
            swapped,
            sorted: self.sorted.clone(),
            pass_completed,
            done: false,
            highlighted_lines: CodeLines::from_lines(lines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_is_untouched_input() {
        let recorder = TraceRecorder::new(&[3, 1, 2], &[0]);
        let steps = recorder.finish(&[9]);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].array, vec![3, 1, 2]);
        assert!(steps[0].sorted.is_empty());
        assert!(!steps[0].done);
        assert!(steps[1].done);
        assert_eq!(steps[1].sorted, (0..3).collect());
    }

    #[test]
    fn test_rotate_into_keeps_permutation() {
        let mut recorder = TraceRecorder::new(&[4, 5, 6, 1], &[0]);
        recorder.rotate_into(0, 3, &[1]);
        let steps = recorder.finish(&[2]);

        assert_eq!(steps[1].array, vec![1, 4, 5, 6]);
        assert_eq!(steps[1].swapped, [0, 3].into_iter().collect());
    }

    #[test]
    fn test_settle_is_sticky() {
        let mut recorder = TraceRecorder::new(&[2, 1], &[0]);
        recorder.settle([1]);
        recorder.swap(0, 1, &[1]);
        recorder.settle([1]);
        recorder.mark(&[2]);
        let steps = recorder.finish(&[3]);

        assert_eq!(steps[1].sorted, [1].into_iter().collect());
        assert_eq!(steps[2].sorted, [1].into_iter().collect());
        assert_eq!(steps[1].array, vec![1, 2]);
    }
}
