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

//! Assignment states.
//!
//! An `AssignmentState` is a partial assignment of tasks to quay cranes: one
//! ordered task sequence per crane (insertion order is execution order), the
//! accumulated load of every crane, the bay each crane last worked at, and
//! the oracle constraint handle grown alongside the sequences.
//!
//! States are immutable once built. `apply_action` is the only way to obtain
//! a new one: it clones the parent and extends the clone, so a state stored in
//! a fringe or an explored set is never mutated behind its owner's back.
//!
//! Identity is structural over the per-crane sequences only (`Assignment`).
//! Loads and locations are derived from the sequences, so two states that
//! compare equal also agree on them.

use crate::oracle::{ConstraintSet, OracleSolution};
use fixedbitset::FixedBitSet;
use qcs_core::num::SolverNumeric;
use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
    solution::Solution,
};
use std::hash::{Hash, Hasher};

/// A single branching decision: append `task` to `crane`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Action {
    crane: CraneIndex,
    task: TaskIndex,
}

impl Action {
    #[inline(always)]
    pub const fn new(crane: CraneIndex, task: TaskIndex) -> Self {
        Self { crane, task }
    }

    #[inline(always)]
    pub const fn crane(&self) -> CraneIndex {
        self.crane
    }

    #[inline(always)]
    pub const fn task(&self) -> TaskIndex {
        self.task
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QC{} <- task {}", self.crane.get() + 1, self.task.get())
    }
}

/// The error returned when an action cannot be applied to a state.
///
/// Expansion only ever proposes valid actions, so seeing this means a caller
/// broke the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidActionError {
    /// The task already appears in some crane's sequence.
    TaskAlreadyAssigned(TaskIndex),
    /// The task index is outside the instance.
    TaskOutOfBounds { task: TaskIndex, num_tasks: usize },
    /// The crane index is outside the instance.
    CraneOutOfBounds { crane: CraneIndex, num_cranes: usize },
}

impl std::fmt::Display for InvalidActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskAlreadyAssigned(task) => {
                write!(f, "Task {} is already assigned to a crane", task.get())
            }
            Self::TaskOutOfBounds { task, num_tasks } => write!(
                f,
                "Task index {} is out of bounds for {} tasks",
                task.get(),
                num_tasks
            ),
            Self::CraneOutOfBounds { crane, num_cranes } => write!(
                f,
                "Crane index {} is out of bounds for {} cranes",
                crane.get(),
                num_cranes
            ),
        }
    }
}

impl std::error::Error for InvalidActionError {}

/// Per-crane ordered task sequences. Equality and hashing are element-wise.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Assignment {
    sequences: Vec<Vec<TaskIndex>>,
}

impl Assignment {
    /// An assignment with `num_cranes` empty sequences.
    #[inline]
    pub fn empty(num_cranes: usize) -> Self {
        Self {
            sequences: vec![Vec::new(); num_cranes],
        }
    }

    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.sequences.len()
    }

    #[inline]
    pub fn sequence(&self, crane: CraneIndex) -> &[TaskIndex] {
        &self.sequences[crane.get()]
    }

    #[inline]
    pub fn sequences(&self) -> &[Vec<TaskIndex>] {
        &self.sequences
    }

    /// Total number of assigned tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequences.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequences.iter().all(Vec::is_empty)
    }

    #[inline]
    pub fn into_sequences(self) -> Vec<Vec<TaskIndex>> {
        self.sequences
    }
}

impl From<Vec<Vec<TaskIndex>>> for Assignment {
    #[inline]
    fn from(sequences: Vec<Vec<TaskIndex>>) -> Self {
        Self { sequences }
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (crane, sequence) in self.sequences.iter().enumerate() {
            if crane > 0 {
                write!(f, "; ")?;
            }
            write!(f, "QC{}:", crane + 1)?;
            for (position, task) in sequence.iter().enumerate() {
                if position == 0 {
                    write!(f, " {}", task.get())?;
                } else {
                    write!(f, " -> {}", task.get())?;
                }
            }
        }
        Ok(())
    }
}

/// A node payload of the assignment search.
#[derive(Clone, Debug)]
pub struct AssignmentState<T, C> {
    assignment: Assignment,
    completion_times: Vec<T>,
    current_locations: Vec<i64>,
    task_completion_times: Vec<T>,
    assigned: FixedBitSet,
    constraints: C,
}

impl<T, C> AssignmentState<T, C>
where
    T: SolverNumeric,
    C: ConstraintSet<T>,
{
    /// The start state: all sequences empty, all loads zero, every crane at
    /// its start bay.
    pub fn start(problem: &Problem<T>) -> Self {
        Self {
            assignment: Assignment::empty(problem.num_cranes()),
            completion_times: vec![T::zero(); problem.num_cranes()],
            current_locations: problem.crane_locations().to_vec(),
            task_completion_times: vec![T::zero(); problem.num_tasks()],
            assigned: FixedBitSet::with_capacity(problem.num_tasks()),
            constraints: C::for_problem(problem),
        }
    }

    /// Returns a fresh state with `action.task()` appended to
    /// `action.crane()`. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of bounds or the task is already
    /// assigned anywhere.
    pub fn apply_action(
        &self,
        problem: &Problem<T>,
        action: Action,
    ) -> Result<Self, InvalidActionError> {
        let crane = action.crane();
        let task = action.task();

        if crane.get() >= self.completion_times.len() {
            return Err(InvalidActionError::CraneOutOfBounds {
                crane,
                num_cranes: self.completion_times.len(),
            });
        }
        if task.get() >= self.assigned.len() {
            return Err(InvalidActionError::TaskOutOfBounds {
                task,
                num_tasks: self.assigned.len(),
            });
        }
        if self.assigned.contains(task.get()) {
            return Err(InvalidActionError::TaskAlreadyAssigned(task));
        }

        let mut child = self.clone();
        let predecessor = child.assignment.sequences[crane.get()].last().copied();
        let completion = child.completion_times[crane.get()] + problem.task_duration(task);

        child.assignment.sequences[crane.get()].push(task);
        child.completion_times[crane.get()] = completion;
        child.current_locations[crane.get()] = problem.task_location(task);
        child.task_completion_times[task.get()] = completion;
        child.assigned.insert(task.get());
        child
            .constraints
            .record_assignment(crane, predecessor, task, completion);

        Ok(child)
    }

    /// Rebuilds a state by replaying `sequences` crane by crane from the
    /// start state.
    pub fn from_sequences(
        problem: &Problem<T>,
        sequences: &[Vec<TaskIndex>],
    ) -> Result<Self, InvalidActionError> {
        if sequences.len() != problem.num_cranes() {
            return Err(InvalidActionError::CraneOutOfBounds {
                crane: CraneIndex::new(sequences.len().saturating_sub(1)),
                num_cranes: problem.num_cranes(),
            });
        }

        let mut state = Self::start(problem);
        for (crane, sequence) in sequences.iter().enumerate() {
            for &task in sequence {
                state = state.apply_action(problem, Action::new(CraneIndex::new(crane), task))?;
            }
        }
        Ok(state)
    }

    /// Turns the state into a `Solution` using the schedule an oracle
    /// produced for it. Tasks the oracle left unscheduled fall back to the
    /// back-to-back crane schedule.
    pub fn to_solution(&self, problem: &Problem<T>, schedule: &OracleSolution<T>) -> Solution<T> {
        let mut completion_times = Vec::with_capacity(problem.num_tasks());
        let mut start_times = Vec::with_capacity(problem.num_tasks());
        for task in problem.tasks() {
            let completion = schedule
                .completion_time(task)
                .unwrap_or(self.task_completion_times[task.get()]);
            completion_times.push(completion);
            start_times.push(completion - problem.task_duration(task));
        }

        Solution::new(
            schedule.objective(),
            self.assignment.sequences.clone(),
            start_times,
            completion_times,
        )
    }
}

impl<T, C> AssignmentState<T, C>
where
    T: SolverNumeric,
{
    /// `true` iff every task is assigned.
    #[inline]
    pub fn is_goal(&self) -> bool {
        self.assigned.count_ones(..) == self.assigned.len()
    }

    /// The largest crane load.
    #[inline]
    pub fn objective(&self) -> T {
        self.completion_times
            .iter()
            .copied()
            .max()
            .unwrap_or_else(T::zero)
    }

    /// Sum of all crane loads.
    #[inline]
    pub fn total_load(&self) -> T {
        self.completion_times.iter().copied().sum()
    }

    #[inline]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    #[inline]
    pub fn sequence(&self, crane: CraneIndex) -> &[TaskIndex] {
        self.assignment.sequence(crane)
    }

    #[inline]
    pub fn num_cranes(&self) -> usize {
        self.completion_times.len()
    }

    #[inline]
    pub fn completion_time(&self, crane: CraneIndex) -> T {
        self.completion_times[crane.get()]
    }

    #[inline]
    pub fn completion_times(&self) -> &[T] {
        &self.completion_times
    }

    /// Bay of the crane's last task, or its start bay.
    #[inline]
    pub fn current_location(&self, crane: CraneIndex) -> i64 {
        self.current_locations[crane.get()]
    }

    #[inline]
    pub fn is_assigned(&self, task: TaskIndex) -> bool {
        self.assigned.contains(task.get())
    }

    /// The crane load right after `task` was appended, if it is assigned.
    #[inline]
    pub fn task_completion_time(&self, task: TaskIndex) -> Option<T> {
        self.is_assigned(task)
            .then(|| self.task_completion_times[task.get()])
    }

    #[inline]
    pub fn num_assigned(&self) -> usize {
        self.assigned.count_ones(..)
    }

    /// Iterates over unassigned tasks in ascending order.
    #[inline]
    pub fn unassigned_tasks(&self) -> impl Iterator<Item = TaskIndex> + '_ {
        self.assigned.zeroes().map(TaskIndex::new)
    }

    #[inline]
    pub fn constraints(&self) -> &C {
        &self.constraints
    }
}

impl<T, C> PartialEq for AssignmentState<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.assignment == other.assignment
    }
}

impl<T, C> Eq for AssignmentState<T, C> {}

impl<T, C> Hash for AssignmentState<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.assignment.hash(state);
    }
}

impl<T, C> std::fmt::Display for AssignmentState<T, C>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssignmentState({}, objective: {})",
            self.assignment,
            self.objective()
        )
    }
}
