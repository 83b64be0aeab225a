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

//! Quay crane scheduling instance.
//!
//! A `Problem<T>` is the read-only input shared by every other component: task
//! durations, task bay locations, crane start bays, and two pair sets.
//!
//! - Non-simultaneity pairs are unordered. The two tasks of a pair must not be
//!   processed in overlapping time windows. They are stored normalised
//!   (`first < second`), sorted and deduplicated.
//! - Precedence pairs `(i, j)` are ordered and read literally as
//!   `completion(i) + duration(j) <= completion(j)`.
//!
//! Durations are strictly positive. Bay locations are plain `i64` positions
//! along the ship. Construct instances through `ProblemBuilder` or the text
//! loader in `loading`.

use crate::index::{CraneIndex, TaskIndex};
use qcs_core::num::SolverNumeric;
use rustc_hash::FxHashSet;

/// An immutable quay crane scheduling instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem<T> {
    durations: Vec<T>,
    task_locations: Vec<i64>,
    crane_locations: Vec<i64>,
    non_simultaneous: Vec<(TaskIndex, TaskIndex)>,
    precedences: Vec<(TaskIndex, TaskIndex)>,
    predecessors: Vec<Vec<TaskIndex>>,
    successors: Vec<Vec<TaskIndex>>,
    total_duration: T,
    ship_bay_span: u64,
}

impl<T> Problem<T>
where
    T: SolverNumeric,
{
    /// Returns the number of tasks.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.durations.len()
    }

    /// Returns the number of quay cranes.
    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.crane_locations.len()
    }

    /// Iterates over all task indices in ascending order.
    #[inline]
    pub fn tasks(&self) -> impl DoubleEndedIterator<Item = TaskIndex> + ExactSizeIterator {
        TaskIndex::range(self.num_tasks())
    }

    /// Iterates over all crane indices in ascending order.
    #[inline]
    pub fn cranes(&self) -> impl DoubleEndedIterator<Item = CraneIndex> + ExactSizeIterator {
        CraneIndex::range(self.num_cranes())
    }

    /// Returns the processing duration of `task`.
    ///
    /// # Panics
    ///
    /// Panics if `task` is not in `0..num_tasks()`.
    #[inline]
    pub fn task_duration(&self, task: TaskIndex) -> T {
        let index = task.get();
        debug_assert!(
            index < self.num_tasks(),
            "called `Problem::task_duration` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks(),
            index
        );

        self.durations[index]
    }

    /// Returns the ship bay of `task`.
    ///
    /// # Panics
    ///
    /// Panics if `task` is not in `0..num_tasks()`.
    #[inline]
    pub fn task_location(&self, task: TaskIndex) -> i64 {
        let index = task.get();
        debug_assert!(
            index < self.num_tasks(),
            "called `Problem::task_location` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks(),
            index
        );

        self.task_locations[index]
    }

    /// Returns the ship bay a crane starts at.
    ///
    /// # Panics
    ///
    /// Panics if `crane` is not in `0..num_cranes()`.
    #[inline]
    pub fn crane_location(&self, crane: CraneIndex) -> i64 {
        let index = crane.get();
        debug_assert!(
            index < self.num_cranes(),
            "called `Problem::crane_location` with crane index out of bounds: the len is {} but the index is {}",
            self.num_cranes(),
            index
        );

        self.crane_locations[index]
    }

    #[inline]
    pub fn durations(&self) -> &[T] {
        &self.durations
    }

    #[inline]
    pub fn task_locations(&self) -> &[i64] {
        &self.task_locations
    }

    #[inline]
    pub fn crane_locations(&self) -> &[i64] {
        &self.crane_locations
    }

    /// Returns the non-simultaneity pairs, each with `first < second`.
    #[inline]
    pub fn non_simultaneous_pairs(&self) -> &[(TaskIndex, TaskIndex)] {
        &self.non_simultaneous
    }

    /// Returns the precedence pairs `(before, after)`.
    #[inline]
    pub fn precedence_pairs(&self) -> &[(TaskIndex, TaskIndex)] {
        &self.precedences
    }

    /// Returns every `i` with a precedence pair `(i, task)`.
    #[inline]
    pub fn predecessors_of(&self, task: TaskIndex) -> &[TaskIndex] {
        &self.predecessors[task.get()]
    }

    /// Returns every `j` with a precedence pair `(task, j)`.
    #[inline]
    pub fn successors_of(&self, task: TaskIndex) -> &[TaskIndex] {
        &self.successors[task.get()]
    }

    /// Returns `true` if `a` and `b` form a non-simultaneity pair.
    pub fn are_non_simultaneous(&self, a: TaskIndex, b: TaskIndex) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.non_simultaneous.binary_search(&key).is_ok()
    }

    /// Sum of all task durations.
    #[inline]
    pub fn total_duration(&self) -> T {
        self.total_duration
    }

    /// `max(task_locations) - min(task_locations)`, or `0` without tasks.
    #[inline]
    pub fn ship_bay_span(&self) -> u64 {
        self.ship_bay_span
    }
}

impl<T> std::fmt::Display for Problem<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem(tasks: {}, cranes: {}, non-simultaneous pairs: {}, precedence pairs: {}, span: {})",
            self.num_tasks(),
            self.num_cranes(),
            self.non_simultaneous.len(),
            self.precedences.len(),
            self.ship_bay_span
        )
    }
}

/// Incrementally assembles a `Problem<T>`.
///
/// Every task starts with duration one at bay zero and every crane at bay
/// zero. Pairs may be added in any order and more than once.
///
/// # Examples
///
/// ```rust
/// use qcs_model::index::{CraneIndex, TaskIndex};
/// use qcs_model::problem::ProblemBuilder;
///
/// let mut builder = ProblemBuilder::<i64>::new(3, 2);
/// builder
///     .set_task_duration(TaskIndex::new(0), 4)
///     .set_task_location(TaskIndex::new(2), 5)
///     .set_crane_location(CraneIndex::new(1), 5)
///     .add_non_simultaneous(TaskIndex::new(2), TaskIndex::new(0));
/// let problem = builder.build();
///
/// assert_eq!(problem.total_duration(), 6);
/// assert_eq!(problem.ship_bay_span(), 5);
/// assert!(problem.are_non_simultaneous(TaskIndex::new(0), TaskIndex::new(2)));
/// ```
#[derive(Clone, Debug)]
pub struct ProblemBuilder<T> {
    durations: Vec<T>,
    task_locations: Vec<i64>,
    crane_locations: Vec<i64>,
    non_simultaneous: FxHashSet<(TaskIndex, TaskIndex)>,
    precedences: FxHashSet<(TaskIndex, TaskIndex)>,
}

impl<T> ProblemBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates a builder for `num_tasks` tasks and `num_cranes` cranes.
    pub fn new(num_tasks: usize, num_cranes: usize) -> Self {
        Self {
            durations: vec![T::one(); num_tasks],
            task_locations: vec![0; num_tasks],
            crane_locations: vec![0; num_cranes],
            non_simultaneous: FxHashSet::default(),
            precedences: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.durations.len()
    }

    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.crane_locations.len()
    }

    /// Sets the duration of `task`.
    ///
    /// # Panics
    ///
    /// Panics if `task` is out of bounds. In debug builds, also panics if
    /// `duration` is not strictly positive.
    pub fn set_task_duration(&mut self, task: TaskIndex, duration: T) -> &mut Self {
        debug_assert!(
            task.get() < self.num_tasks(),
            "called `ProblemBuilder::set_task_duration` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks(),
            task.get()
        );
        debug_assert!(
            duration.is_positive(),
            "called `ProblemBuilder::set_task_duration` with a non-positive duration {} for task {}",
            duration,
            task.get()
        );

        self.durations[task.get()] = duration;
        self
    }

    /// Sets the ship bay of `task`.
    ///
    /// # Panics
    ///
    /// Panics if `task` is out of bounds.
    pub fn set_task_location(&mut self, task: TaskIndex, location: i64) -> &mut Self {
        debug_assert!(
            task.get() < self.num_tasks(),
            "called `ProblemBuilder::set_task_location` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks(),
            task.get()
        );

        self.task_locations[task.get()] = location;
        self
    }

    /// Sets the start bay of `crane`.
    ///
    /// # Panics
    ///
    /// Panics if `crane` is out of bounds.
    pub fn set_crane_location(&mut self, crane: CraneIndex, location: i64) -> &mut Self {
        debug_assert!(
            crane.get() < self.num_cranes(),
            "called `ProblemBuilder::set_crane_location` with crane index out of bounds: the len is {} but the index is {}",
            self.num_cranes(),
            crane.get()
        );

        self.crane_locations[crane.get()] = location;
        self
    }

    /// Adds an unordered non-simultaneity pair.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either task is out of bounds or `a == b`.
    pub fn add_non_simultaneous(&mut self, a: TaskIndex, b: TaskIndex) -> &mut Self {
        self.debug_assert_pair("add_non_simultaneous", a, b);
        let key = if a < b { (a, b) } else { (b, a) };
        self.non_simultaneous.insert(key);
        self
    }

    /// Adds an ordered precedence pair `(before, after)`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either task is out of bounds or
    /// `before == after`.
    pub fn add_precedence(&mut self, before: TaskIndex, after: TaskIndex) -> &mut Self {
        self.debug_assert_pair("add_precedence", before, after);
        self.precedences.insert((before, after));
        self
    }

    #[inline(always)]
    fn debug_assert_pair(&self, method: &str, a: TaskIndex, b: TaskIndex) {
        debug_assert!(
            a.get() < self.num_tasks() && b.get() < self.num_tasks(),
            "called `ProblemBuilder::{}` with task index out of bounds: the len is {} but the pair is ({}, {})",
            method,
            self.num_tasks(),
            a.get(),
            b.get()
        );
        debug_assert!(
            a != b,
            "called `ProblemBuilder::{}` with a task paired with itself: {}",
            method,
            a.get()
        );
    }

    /// Freezes the builder into a `Problem<T>`.
    pub fn build(self) -> Problem<T> {
        let num_tasks = self.durations.len();

        let mut non_simultaneous: Vec<_> = self.non_simultaneous.into_iter().collect();
        non_simultaneous.sort_unstable();

        let mut precedences: Vec<_> = self.precedences.into_iter().collect();
        precedences.sort_unstable();

        let mut predecessors = vec![Vec::new(); num_tasks];
        let mut successors = vec![Vec::new(); num_tasks];
        for &(before, after) in &precedences {
            successors[before.get()].push(after);
            predecessors[after.get()].push(before);
        }

        let total_duration = self.durations.iter().copied().sum();
        let ship_bay_span = match (
            self.task_locations.iter().min(),
            self.task_locations.iter().max(),
        ) {
            (Some(min), Some(max)) => max.abs_diff(*min),
            _ => 0,
        };

        Problem {
            durations: self.durations,
            task_locations: self.task_locations,
            crane_locations: self.crane_locations,
            non_simultaneous,
            precedences,
            predecessors,
            successors,
            total_duration,
            ship_bay_span,
        }
    }
}
