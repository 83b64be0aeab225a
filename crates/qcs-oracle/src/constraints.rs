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

//! The constraint handle grown alongside an assignment state.

use qcs_core::num::SolverNumeric;
use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
};
use qcs_search::oracle::ConstraintSet;

/// One recorded assignment: `task` runs on `crane` right after `predecessor`,
/// or first when there is none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequencingArc {
    pub crane: CraneIndex,
    pub predecessor: Option<TaskIndex>,
    pub task: TaskIndex,
}

/// Crane sequencing arcs plus an objective bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencingConstraints<T> {
    crane_of: Vec<Option<CraneIndex>>,
    arcs: Vec<SequencingArc>,
    crane_loads: Vec<T>,
    upper_bound: Option<T>,
}

impl<T> SequencingConstraints<T>
where
    T: SolverNumeric,
{
    /// The crane a task was assigned to, if any.
    #[inline]
    pub fn crane_of(&self, task: TaskIndex) -> Option<CraneIndex> {
        self.crane_of[task.get()]
    }

    #[inline]
    pub fn is_assigned(&self, task: TaskIndex) -> bool {
        self.crane_of(task).is_some()
    }

    /// Recorded arcs in assignment order.
    #[inline]
    pub fn arcs(&self) -> &[SequencingArc] {
        &self.arcs
    }

    /// Accumulated load of `crane`.
    #[inline]
    pub fn crane_load(&self, crane: CraneIndex) -> T {
        self.crane_loads[crane.get()]
    }

    #[inline]
    pub fn num_assigned(&self) -> usize {
        self.arcs.len()
    }
}

impl<T> ConstraintSet<T> for SequencingConstraints<T>
where
    T: SolverNumeric,
{
    fn for_problem(problem: &Problem<T>) -> Self {
        Self {
            crane_of: vec![None; problem.num_tasks()],
            arcs: Vec::with_capacity(problem.num_tasks()),
            crane_loads: vec![T::zero(); problem.num_cranes()],
            upper_bound: None,
        }
    }

    fn record_assignment(
        &mut self,
        crane: CraneIndex,
        predecessor: Option<TaskIndex>,
        task: TaskIndex,
        crane_completion: T,
    ) {
        debug_assert!(
            self.crane_of[task.get()].is_none(),
            "called `SequencingConstraints::record_assignment` for task {} which is already assigned",
            task.get()
        );

        self.crane_of[task.get()] = Some(crane);
        self.crane_loads[crane.get()] = crane_completion;
        self.arcs.push(SequencingArc {
            crane,
            predecessor,
            task,
        });
    }

    fn tighten_upper_bound(&mut self, bound: T) {
        self.upper_bound = Some(match self.upper_bound {
            Some(current) => current.min(bound),
            None => bound,
        });
    }

    #[inline]
    fn upper_bound(&self) -> Option<T> {
        self.upper_bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_model::problem::ProblemBuilder;

    #[test]
    fn test_record_and_tighten() {
        let problem = ProblemBuilder::<i64>::new(3, 2).build();
        let mut constraints = SequencingConstraints::for_problem(&problem);

        constraints.record_assignment(CraneIndex::new(1), None, TaskIndex::new(2), 1);
        constraints.record_assignment(
            CraneIndex::new(1),
            Some(TaskIndex::new(2)),
            TaskIndex::new(0),
            2,
        );
        constraints.tighten_upper_bound(9);
        constraints.tighten_upper_bound(12);

        assert_eq!(constraints.crane_of(TaskIndex::new(0)), Some(CraneIndex::new(1)));
        assert!(!constraints.is_assigned(TaskIndex::new(1)));
        assert_eq!(constraints.crane_load(CraneIndex::new(1)), 2);
        assert_eq!(constraints.num_assigned(), 2);
        assert_eq!(constraints.arcs()[1].predecessor, Some(TaskIndex::new(2)));
        assert_eq!(constraints.upper_bound(), Some(9));
    }
}
