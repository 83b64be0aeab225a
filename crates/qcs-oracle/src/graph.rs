// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Completion-time propagation.
//!
//! Nodes are tasks, an arc `u -> v` with weight `w` reads
//! `completion(v) >= completion(u) + w`, and every active task completes no
//! earlier than its own duration. Earliest completion times are longest
//! paths, computed in topological order. A cycle means the arcs cannot all
//! hold.

use fixedbitset::FixedBitSet;
use qcs_core::num::SolverNumeric;
use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub(crate) struct TemporalGraph<T> {
    active: FixedBitSet,
    adjacency: Vec<SmallVec<[(usize, T); 4]>>,
    indegree: Vec<usize>,
    queue: Vec<usize>,
}

impl<T> TemporalGraph<T>
where
    T: SolverNumeric,
{
    pub(crate) fn new(num_tasks: usize) -> Self {
        Self {
            active: FixedBitSet::with_capacity(num_tasks),
            adjacency: vec![SmallVec::new(); num_tasks],
            indegree: vec![0; num_tasks],
            queue: Vec::with_capacity(num_tasks),
        }
    }

    #[inline]
    pub(crate) fn activate(&mut self, task: usize) {
        self.active.insert(task);
    }

    #[inline]
    pub(crate) fn is_active(&self, task: usize) -> bool {
        self.active.contains(task)
    }

    #[inline]
    pub(crate) fn active_tasks(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.ones()
    }

    /// Adds `completion(to) >= completion(from) + weight`. Both ends must be
    /// active.
    #[inline]
    pub(crate) fn push_arc(&mut self, from: usize, to: usize, weight: T) {
        debug_assert!(
            self.is_active(from) && self.is_active(to),
            "called `TemporalGraph::push_arc` with an inactive endpoint: {} -> {}",
            from,
            to
        );
        self.adjacency[from].push((to, weight));
    }

    /// Removes the most recently pushed arc leaving `from`.
    #[inline]
    pub(crate) fn pop_arc(&mut self, from: usize) {
        self.adjacency[from].pop();
    }

    /// Writes earliest completion times of active tasks into `completion`.
    /// Returns `false` if the arcs contain a cycle.
    pub(crate) fn earliest_completions(&mut self, durations: &[T], completion: &mut [T]) -> bool {
        let mut num_active = 0usize;
        for task in self.active.ones() {
            num_active += 1;
            self.indegree[task] = 0;
            completion[task] = durations[task];
        }
        for task in self.active.ones() {
            for &(to, _) in &self.adjacency[task] {
                self.indegree[to] += 1;
            }
        }

        self.queue.clear();
        self.queue
            .extend(self.active.ones().filter(|&task| self.indegree[task] == 0));

        let mut processed = 0usize;
        while let Some(task) = self.queue.pop() {
            processed += 1;
            let done = completion[task];
            for &(to, weight) in &self.adjacency[task] {
                let candidate = done + weight;
                if candidate > completion[to] {
                    completion[to] = candidate;
                }
                self.indegree[to] -= 1;
                if self.indegree[to] == 0 {
                    self.queue.push(to);
                }
            }
        }

        processed == num_active
    }
}
