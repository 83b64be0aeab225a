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

//! Feasibility and objective oracle contract.
//!
//! Both engines treat exact evaluation of a (partial) assignment as a black
//! box. Every `AssignmentState` owns a `ConstraintSet` handle that grows as
//! actions are applied. The engines hand it to an `Oracle`, which answers
//! `Feasible` with an objective and per-task completion times, or
//! `Infeasible`.
//!
//! Handles are cloned, never shared: tightening the clone held by a child or
//! by an engine leaves the parent untouched. Oracles must be deterministic
//! for a fixed handle and may be slow. Engines call them synchronously.
//!
//! The objective returned for a partial assignment must never exceed the
//! objective of any of its completions. The branch-and-bound engine prunes
//! on it.

use qcs_core::num::SolverNumeric;
use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
};

/// An oracle-side constraint system, owned by a single assignment state.
pub trait ConstraintSet<T>: Clone + std::fmt::Debug {
    /// Builds the root constraint set for `problem`, with no task assigned.
    fn for_problem(problem: &Problem<T>) -> Self;

    /// Records that `task` was appended to `crane`, directly after
    /// `predecessor` (or as the crane's first task), bringing the crane's
    /// accumulated load to `crane_completion`.
    fn record_assignment(
        &mut self,
        crane: CraneIndex,
        predecessor: Option<TaskIndex>,
        task: TaskIndex,
        crane_completion: T,
    );

    /// Requires the objective to be at most `bound` from now on. Bounds only
    /// ever tighten.
    fn tighten_upper_bound(&mut self, bound: T);

    /// Returns the tightest recorded objective bound.
    fn upper_bound(&self) -> Option<T>;
}

/// The schedule an oracle found for a feasible constraint set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleSolution<T> {
    objective: T,
    completion_times: Vec<Option<T>>,
}

impl<T> OracleSolution<T>
where
    T: SolverNumeric,
{
    /// Creates a solution. `completion_times` holds one entry per task,
    /// `None` for tasks the constraint set does not cover yet.
    #[inline]
    pub fn new(objective: T, completion_times: Vec<Option<T>>) -> Self {
        Self {
            objective,
            completion_times,
        }
    }

    #[inline]
    pub fn objective(&self) -> T {
        self.objective
    }

    #[inline]
    pub fn completion_time(&self, task: TaskIndex) -> Option<T> {
        self.completion_times.get(task.get()).copied().flatten()
    }

    #[inline]
    pub fn completion_times(&self) -> &[Option<T>] {
        &self.completion_times
    }
}

/// The answer of an oracle query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleStatus<T> {
    Feasible(OracleSolution<T>),
    Infeasible,
}

impl<T> OracleStatus<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, OracleStatus::Feasible(_))
    }

    #[inline]
    pub fn objective(&self) -> Option<T> {
        match self {
            OracleStatus::Feasible(solution) => Some(solution.objective()),
            OracleStatus::Infeasible => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<OracleSolution<T>> {
        match self {
            OracleStatus::Feasible(solution) => Some(solution),
            OracleStatus::Infeasible => None,
        }
    }
}

impl<T> std::fmt::Display for OracleStatus<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleStatus::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective())
            }
            OracleStatus::Infeasible => write!(f, "Infeasible"),
        }
    }
}

/// An exact feasibility/objective evaluator.
pub trait Oracle<T> {
    /// The constraint handle this oracle understands.
    type Constraints: ConstraintSet<T>;

    /// Returns the name of the oracle.
    fn name(&self) -> &str;

    /// Solves the constraint set. Deterministic for a fixed input.
    fn solve(&mut self, problem: &Problem<T>, constraints: &Self::Constraints)
    -> OracleStatus<T>;
}

/// Constraint handle of the `CraneLoadOracle`: the accumulated load of every
/// crane and the objective bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraneLoads<T> {
    loads: Vec<T>,
    completion_times: Vec<Option<T>>,
    upper_bound: Option<T>,
}

impl<T> CraneLoads<T> {
    #[inline]
    pub fn loads(&self) -> &[T] {
        &self.loads
    }
}

impl<T> ConstraintSet<T> for CraneLoads<T>
where
    T: SolverNumeric,
{
    fn for_problem(problem: &Problem<T>) -> Self {
        Self {
            loads: vec![T::zero(); problem.num_cranes()],
            completion_times: vec![None; problem.num_tasks()],
            upper_bound: None,
        }
    }

    fn record_assignment(
        &mut self,
        crane: CraneIndex,
        _predecessor: Option<TaskIndex>,
        task: TaskIndex,
        crane_completion: T,
    ) {
        self.loads[crane.get()] = crane_completion;
        self.completion_times[task.get()] = Some(crane_completion);
    }

    fn tighten_upper_bound(&mut self, bound: T) {
        self.upper_bound = Some(self.upper_bound.map_or(bound, |ub| ub.min(bound)));
    }

    #[inline]
    fn upper_bound(&self) -> Option<T> {
        self.upper_bound
    }
}

/// A relaxation oracle that ignores pair constraints: the objective is the
/// largest crane load, and the only way to be infeasible is to exceed the
/// recorded upper bound.
///
/// Exact for instances without non-simultaneity and precedence pairs, and a
/// cheap stand-in wherever the engines need an oracle double.
#[derive(Clone, Debug, Default)]
pub struct CraneLoadOracle {
    calls: u64,
}

impl CraneLoadOracle {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `solve` calls so far.
    #[inline]
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl<T> Oracle<T> for CraneLoadOracle
where
    T: SolverNumeric,
{
    type Constraints = CraneLoads<T>;

    fn name(&self) -> &str {
        "CraneLoadOracle"
    }

    fn solve(&mut self, _problem: &Problem<T>, constraints: &CraneLoads<T>) -> OracleStatus<T> {
        self.calls = self.calls.saturating_add(1);

        let objective = constraints
            .loads
            .iter()
            .copied()
            .max()
            .unwrap_or_else(T::zero);
        if constraints.upper_bound.is_some_and(|ub| objective > ub) {
            return OracleStatus::Infeasible;
        }

        OracleStatus::Feasible(OracleSolution::new(
            objective,
            constraints.completion_times.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_model::problem::ProblemBuilder;

    fn problem() -> Problem<i64> {
        let mut builder = ProblemBuilder::<i64>::new(3, 2);
        builder
            .set_task_duration(TaskIndex::new(0), 4)
            .set_task_duration(TaskIndex::new(1), 6)
            .set_task_duration(TaskIndex::new(2), 3);
        builder.build()
    }

    #[test]
    fn test_crane_load_oracle_reports_max_load() {
        let problem = problem();
        let mut constraints = CraneLoads::for_problem(&problem);
        constraints.record_assignment(CraneIndex::new(0), None, TaskIndex::new(0), 4);
        constraints.record_assignment(CraneIndex::new(1), None, TaskIndex::new(1), 6);

        let mut oracle = CraneLoadOracle::new();
        let status = oracle.solve(&problem, &constraints);

        assert_eq!(status.objective(), Some(6));
        let solution = status.into_solution().expect("should be feasible");
        assert_eq!(solution.completion_time(TaskIndex::new(0)), Some(4));
        assert_eq!(solution.completion_time(TaskIndex::new(2)), None);
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn test_upper_bound_makes_relaxation_infeasible() {
        let problem = problem();
        let mut constraints = CraneLoads::for_problem(&problem);
        constraints.record_assignment(CraneIndex::new(0), None, TaskIndex::new(1), 6);
        constraints.tighten_upper_bound(10);
        constraints.tighten_upper_bound(5);
        constraints.tighten_upper_bound(8);

        assert_eq!(constraints.upper_bound(), Some(5));
        let status = CraneLoadOracle::new().solve(&problem, &constraints);
        assert_eq!(status, OracleStatus::Infeasible);
    }

    #[test]
    fn test_cloned_handle_is_independent() {
        let problem = problem();
        let parent = CraneLoads::for_problem(&problem);
        let mut child = parent.clone();
        child.tighten_upper_bound(3);
        child.record_assignment(CraneIndex::new(1), None, TaskIndex::new(2), 3);

        assert_eq!(parent.upper_bound(), None);
        assert_eq!(parent.loads(), &[0, 0]);
        assert_eq!(child.loads(), &[0, 3]);
    }
}
