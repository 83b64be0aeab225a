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

//! The capability interface consumed by the branch-and-bound engine.
//!
//! `SearchProblem` is everything the engine needs to know about the tree it
//! explores. `QcScheduling` is the quay crane implementation. Tests swap in
//! their own implementations to drive the engine on hand-built trees.

use crate::{
    bound,
    expansion::{ExpansionPolicy, Successor},
    oracle::ConstraintSet,
    state::AssignmentState,
};
use qcs_core::num::SolverNumeric;
use qcs_model::problem::Problem;

pub trait SearchProblem<T, C> {
    /// The instance being searched.
    fn problem(&self) -> &Problem<T>;

    /// The root of the search tree.
    fn start_state(&self) -> AssignmentState<T, C>;

    /// `true` if `state` is a complete assignment.
    fn is_goal(&self, state: &AssignmentState<T, C>) -> bool;

    /// All successors of `state`, each one action deeper.
    fn expand(&self, state: &AssignmentState<T, C>) -> Vec<Successor<T, C>>;

    /// An admissible lower bound on every completion of `state`.
    fn lower_bound(&self, state: &AssignmentState<T, C>) -> T;
}

/// Quay crane scheduling over a borrowed `Problem`.
#[derive(Clone, Copy, Debug)]
pub struct QcScheduling<'a, T> {
    problem: &'a Problem<T>,
    policy: ExpansionPolicy,
}

impl<'a, T> QcScheduling<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(problem: &'a Problem<T>, policy: ExpansionPolicy) -> Self {
        Self { problem, policy }
    }

    #[inline]
    pub fn problem(&self) -> &'a Problem<T> {
        self.problem
    }

    #[inline]
    pub fn policy(&self) -> &ExpansionPolicy {
        &self.policy
    }
}

impl<'a, T, C> SearchProblem<T, C> for QcScheduling<'a, T>
where
    T: SolverNumeric,
    C: ConstraintSet<T>,
{
    #[inline]
    fn problem(&self) -> &Problem<T> {
        self.problem
    }

    #[inline]
    fn start_state(&self) -> AssignmentState<T, C> {
        AssignmentState::start(self.problem)
    }

    #[inline]
    fn is_goal(&self, state: &AssignmentState<T, C>) -> bool {
        state.is_goal()
    }

    #[inline]
    fn expand(&self, state: &AssignmentState<T, C>) -> Vec<Successor<T, C>> {
        self.policy.expand(self.problem, state)
    }

    #[inline]
    fn lower_bound(&self, state: &AssignmentState<T, C>) -> T {
        bound::lower_bound(self.problem, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expansion::SpatialEligibility, oracle::CraneLoads};
    use qcs_model::{
        index::{CraneIndex, TaskIndex},
        problem::ProblemBuilder,
    };

    #[test]
    fn test_qc_scheduling_delegates() {
        let mut builder = ProblemBuilder::<i64>::new(3, 2);
        builder
            .set_task_duration(TaskIndex::new(0), 3)
            .set_task_duration(TaskIndex::new(1), 4)
            .set_task_duration(TaskIndex::new(2), 5)
            .set_crane_location(CraneIndex::new(1), 0);
        let problem = builder.build();
        let search = QcScheduling::new(&problem, ExpansionPolicy::new(SpatialEligibility::Zone));

        let root: AssignmentState<i64, CraneLoads<i64>> = search.start_state();
        assert!(!SearchProblem::is_goal(&search, &root));
        assert_eq!(SearchProblem::lower_bound(&search, &root), 6);
        // span zero: both cranes stand on the only bay
        assert_eq!(SearchProblem::expand(&search, &root).len(), 6);
    }
}
