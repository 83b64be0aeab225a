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

//! A complete crane schedule.
//!
//! `Solution<T>` pairs the per-crane task sequences with the timed schedule
//! an oracle produced for them. Tasks occupy the half-open window
//! `[start, completion)`.

use crate::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
};
use qcs_core::num::SolverNumeric;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    objective_value: T,
    sequences: Vec<Vec<TaskIndex>>,
    start_times: Vec<T>,
    completion_times: Vec<T>,
}

impl<T> Solution<T>
where
    T: SolverNumeric,
{
    /// Creates a new solution.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `start_times` and `completion_times`
    /// differ in length.
    pub fn new(
        objective_value: T,
        sequences: Vec<Vec<TaskIndex>>,
        start_times: Vec<T>,
        completion_times: Vec<T>,
    ) -> Self {
        debug_assert_eq!(
            start_times.len(),
            completion_times.len(),
            "called `Solution::new` with mismatched start and completion time lengths"
        );

        Self {
            objective_value,
            sequences,
            start_times,
            completion_times,
        }
    }

    /// The makespan of the schedule.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.sequences.len()
    }

    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.completion_times.len()
    }

    /// Tasks served by `crane`, in execution order.
    #[inline]
    pub fn sequence(&self, crane: CraneIndex) -> &[TaskIndex] {
        &self.sequences[crane.get()]
    }

    #[inline]
    pub fn sequences(&self) -> &[Vec<TaskIndex>] {
        &self.sequences
    }

    #[inline]
    pub fn start_time(&self, task: TaskIndex) -> T {
        self.start_times[task.get()]
    }

    #[inline]
    pub fn completion_time(&self, task: TaskIndex) -> T {
        self.completion_times[task.get()]
    }

    /// Returns the crane serving `task`, if any.
    pub fn crane_of(&self, task: TaskIndex) -> Option<CraneIndex> {
        self.sequences
            .iter()
            .position(|sequence| sequence.contains(&task))
            .map(CraneIndex::new)
    }

    /// Checks the schedule against `problem`.
    ///
    /// A consistent schedule serves every task exactly once, runs each
    /// crane's tasks back to back in sequence order without overlap, keeps
    /// non-simultaneous tasks apart, satisfies every precedence pair as
    /// `completion(i) + duration(j) <= completion(j)`, and reports the latest
    /// completion as its objective.
    pub fn is_consistent_with(&self, problem: &Problem<T>) -> bool {
        let n = problem.num_tasks();
        if self.num_tasks() != n || self.num_cranes() != problem.num_cranes() {
            return false;
        }

        let mut seen = vec![false; n];
        for sequence in &self.sequences {
            let mut previous: Option<TaskIndex> = None;
            for &task in sequence {
                if task.get() >= n || std::mem::replace(&mut seen[task.get()], true) {
                    return false;
                }
                let start = self.start_time(task);
                let completion = self.completion_time(task);
                if start.is_negative() || completion - start != problem.task_duration(task) {
                    return false;
                }
                if let Some(prev) = previous
                    && self.completion_time(prev) > start
                {
                    return false;
                }
                previous = Some(task);
            }
        }
        if seen.iter().any(|&s| !s) {
            return false;
        }

        let overlap = problem.non_simultaneous_pairs().iter().any(|&(a, b)| {
            self.start_time(a) < self.completion_time(b)
                && self.start_time(b) < self.completion_time(a)
        });
        if overlap {
            return false;
        }

        let precedence_violated = problem.precedence_pairs().iter().any(|&(i, j)| {
            self.completion_time(i) + problem.task_duration(j) > self.completion_time(j)
        });
        if precedence_violated {
            return false;
        }

        let makespan = self
            .completion_times
            .iter()
            .copied()
            .max()
            .unwrap_or_else(T::zero);
        makespan == self.objective_value
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Makespan: {}", self.objective_value)?;
        for (crane, sequence) in self.sequences.iter().enumerate() {
            let tasks: Vec<String> = sequence.iter().map(|t| t.get().to_string()).collect();
            writeln!(f, "QC{}: {}", crane + 1, tasks.join(" -> "))?;
        }
        Ok(())
    }
}
