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

//! Disjunctive-graph oracle.
//!
//! For the tasks assigned in a `SequencingConstraints` handle the oracle
//! minimises the makespan `max completion(t)` subject to:
//!
//! - crane chains: the first task of a crane completes no earlier than its
//!   duration, every later one at least its own duration after its
//!   predecessor;
//! - precedence pairs `(i, j)` with both ends assigned:
//!   `completion(i) + duration(j) <= completion(j)`;
//! - non-simultaneity pairs with both ends assigned to different cranes:
//!   `completion(i) + duration(j) <= completion(j)` or
//!   `completion(j) + duration(i) <= completion(i)`;
//! - the recorded upper bound, if any.
//!
//! Pairs on the same crane are already ordered by the chain. Constraints that
//! touch an unassigned task are dropped, which makes the partial objective a
//! lower bound on every completion.
//!
//! Earliest completion times under the fixed arcs are a lower bound for every
//! orientation of the open disjunctions. The search branches on the first
//! disjunction that schedule violates and prunes on the incumbent and the
//! upper bound, so the result is exact.

use crate::{constraints::SequencingConstraints, graph::TemporalGraph, stats::OracleStatistics};
use qcs_core::num::SolverNumeric;
use qcs_model::{index::TaskIndex, problem::Problem};
use qcs_search::oracle::{ConstraintSet, Oracle, OracleSolution, OracleStatus};

#[derive(Clone, Debug, Default)]
pub struct DisjunctiveOracle {
    statistics: OracleStatistics,
}

impl DisjunctiveOracle {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn statistics(&self) -> &OracleStatistics {
        &self.statistics
    }
}

impl<T> Oracle<T> for DisjunctiveOracle
where
    T: SolverNumeric,
{
    type Constraints = SequencingConstraints<T>;

    fn name(&self) -> &str {
        "DisjunctiveOracle"
    }

    fn solve(
        &mut self,
        problem: &Problem<T>,
        constraints: &SequencingConstraints<T>,
    ) -> OracleStatus<T> {
        self.statistics.on_solve();

        let num_tasks = problem.num_tasks();
        let durations = problem.durations();
        let mut graph = TemporalGraph::new(num_tasks);

        for arc in constraints.arcs() {
            graph.activate(arc.task.get());
        }
        for arc in constraints.arcs() {
            if let Some(predecessor) = arc.predecessor {
                graph.push_arc(predecessor.get(), arc.task.get(), durations[arc.task.get()]);
            }
        }
        for &(before, after) in problem.precedence_pairs() {
            if constraints.is_assigned(before) && constraints.is_assigned(after) {
                graph.push_arc(before.get(), after.get(), durations[after.get()]);
            }
        }

        let disjunctions: Vec<(usize, usize)> = problem
            .non_simultaneous_pairs()
            .iter()
            .filter_map(|&(a, b)| match (constraints.crane_of(a), constraints.crane_of(b)) {
                (Some(ca), Some(cb)) if ca != cb => Some((a.get(), b.get())),
                _ => None,
            })
            .collect();

        let mut search = DisjunctiveSearch {
            graph,
            durations,
            disjunctions,
            upper_bound: constraints.upper_bound(),
            best: None,
            nodes: 0,
        };
        search.branch();
        self.statistics.on_branch_nodes(search.nodes);

        match search.best {
            Some((objective, completion)) => {
                let completion_times = (0..num_tasks)
                    .map(|task| {
                        constraints
                            .is_assigned(TaskIndex::new(task))
                            .then(|| completion[task])
                    })
                    .collect();
                OracleStatus::Feasible(OracleSolution::new(objective, completion_times))
            }
            None => {
                self.statistics.on_infeasible();
                tracing::trace!(
                    assigned = constraints.num_assigned(),
                    upper_bound = ?constraints.upper_bound(),
                    "constraint set is infeasible"
                );
                OracleStatus::Infeasible
            }
        }
    }
}

/// Depth-first branching over open disjunctions.
struct DisjunctiveSearch<'a, T> {
    graph: TemporalGraph<T>,
    durations: &'a [T],
    disjunctions: Vec<(usize, usize)>,
    upper_bound: Option<T>,
    best: Option<(T, Vec<T>)>,
    nodes: u64,
}

impl<'a, T> DisjunctiveSearch<'a, T>
where
    T: SolverNumeric,
{
    fn branch(&mut self) {
        self.nodes += 1;

        let mut completion = vec![T::zero(); self.durations.len()];
        if !self.graph.earliest_completions(self.durations, &mut completion) {
            return;
        }

        let makespan = self
            .graph
            .active_tasks()
            .map(|task| completion[task])
            .max()
            .unwrap_or_else(T::zero);

        if let Some(ub) = self.upper_bound
            && makespan > ub
        {
            return;
        }
        if let Some((best, _)) = &self.best
            && makespan >= *best
        {
            return;
        }

        let durations = self.durations;
        let conflict = self.disjunctions.iter().copied().find(|&(i, j)| {
            completion[i] - durations[i] < completion[j]
                && completion[j] - durations[j] < completion[i]
        });

        match conflict {
            None => self.best = Some((makespan, completion)),
            Some((i, j)) => {
                self.graph.push_arc(i, j, durations[j]);
                self.branch();
                self.graph.pop_arc(i);

                self.graph.push_arc(j, i, durations[i]);
                self.branch();
                self.graph.pop_arc(j);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_model::{
        index::CraneIndex,
        problem::ProblemBuilder,
        solution::Solution,
    };
    use qcs_search::state::{Action, AssignmentState};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    type State = AssignmentState<i64, SequencingConstraints<i64>>;

    fn t(i: usize) -> TaskIndex {
        TaskIndex::new(i)
    }

    fn c(i: usize) -> CraneIndex {
        CraneIndex::new(i)
    }

    fn scenario() -> Problem<i64> {
        let mut builder = ProblemBuilder::<i64>::new(5, 2);
        for (i, (&p, &l)) in [8, 10, 20, 5, 30].iter().zip(&[1, 2, 3, 5, 6]).enumerate() {
            builder.set_task_duration(t(i), p).set_task_location(t(i), l);
        }
        builder.set_crane_location(c(0), 1).set_crane_location(c(1), 4);
        for i in 0..4 {
            builder.add_non_simultaneous(t(i), t(i + 1));
        }
        builder.build()
    }

    fn solution_of(problem: &Problem<i64>, state: &State) -> Option<Solution<i64>> {
        DisjunctiveOracle::new()
            .solve(problem, state.constraints())
            .into_solution()
            .map(|schedule| state.to_solution(problem, &schedule))
    }

    #[test]
    fn test_empty_constraint_set_is_feasible_with_zero_objective() {
        let problem = scenario();
        let state = State::start(&problem);
        let status = DisjunctiveOracle::new().solve(&problem, state.constraints());
        assert_eq!(status.objective(), Some(0));
    }

    #[test]
    fn test_scenario_assignment_resolves_disjunction() {
        let problem = scenario();
        let state = State::from_sequences(&problem, &[vec![t(0), t(1), t(2)], vec![t(4), t(3)]])
            .expect("valid sequences");

        let mut oracle = DisjunctiveOracle::new();
        let schedule = oracle
            .solve(&problem, state.constraints())
            .into_solution()
            .expect("feasible");

        // Task 2 must wait for task 3 or the other way round; 3 after 2 is best.
        assert_eq!(schedule.objective(), 43);
        assert_eq!(schedule.completion_time(t(2)), Some(38));
        assert_eq!(schedule.completion_time(t(3)), Some(43));
        assert!(oracle.statistics().branch_nodes >= 3);

        let solution = state.to_solution(&problem, &schedule);
        assert!(solution.is_consistent_with(&problem));
    }

    #[test]
    fn test_upper_bound_cuts_schedules() {
        let problem = scenario();
        let state = State::from_sequences(&problem, &[vec![t(0), t(1), t(2)], vec![t(4), t(3)]])
            .expect("valid sequences");
        let mut oracle = DisjunctiveOracle::new();

        let mut tight = state.constraints().clone();
        tight.tighten_upper_bound(43);
        assert_eq!(oracle.solve(&problem, &tight).objective(), Some(43));

        tight.tighten_upper_bound(42);
        assert_eq!(oracle.solve(&problem, &tight), OracleStatus::Infeasible);
        assert_eq!(oracle.statistics().solves, 2);
        assert_eq!(oracle.statistics().infeasible, 1);

        // the state's own handle is untouched
        assert_eq!(state.constraints().upper_bound(), None);
    }

    #[test]
    fn test_precedence_against_crane_order_is_infeasible() {
        let mut builder = ProblemBuilder::<i64>::new(2, 1);
        builder
            .set_task_duration(t(0), 3)
            .set_task_duration(t(1), 2)
            .add_precedence(t(0), t(1));
        let problem = builder.build();

        let state = State::from_sequences(&problem, &[vec![t(1), t(0)]]).expect("valid sequences");
        let status = DisjunctiveOracle::new().solve(&problem, state.constraints());
        assert_eq!(status, OracleStatus::Infeasible);

        let state = State::from_sequences(&problem, &[vec![t(0), t(1)]]).expect("valid sequences");
        let status = DisjunctiveOracle::new().solve(&problem, state.constraints());
        assert_eq!(status.objective(), Some(5));
    }

    #[test]
    fn test_precedence_delays_other_crane() {
        let mut builder = ProblemBuilder::<i64>::new(2, 2);
        builder
            .set_task_duration(t(0), 6)
            .set_task_duration(t(1), 4)
            .add_precedence(t(0), t(1));
        let problem = builder.build();

        let state = State::from_sequences(&problem, &[vec![t(0)], vec![t(1)]]).expect("valid sequences");
        let schedule = DisjunctiveOracle::new()
            .solve(&problem, state.constraints())
            .into_solution()
            .expect("feasible");
        assert_eq!(schedule.completion_time(t(1)), Some(10));
        assert_eq!(schedule.objective(), 10);
    }

    #[test]
    fn test_pairs_with_unassigned_tasks_are_relaxed() {
        let problem = scenario();
        let state = State::start(&problem)
            .apply_action(&problem, Action::new(c(0), t(2)))
            .and_then(|s| s.apply_action(&problem, Action::new(c(1), t(4))))
            .expect("valid actions");

        let schedule = DisjunctiveOracle::new()
            .solve(&problem, state.constraints())
            .into_solution()
            .expect("feasible");
        assert_eq!(schedule.objective(), 30);
        assert_eq!(schedule.completion_time(t(3)), None);
    }

    #[test]
    fn test_partial_objective_never_exceeds_completion_objective() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let problem = scenario();

        for _ in 0..100 {
            let mut state = State::start(&problem);
            let mut previous = 0i64;
            while !state.is_goal() {
                let unassigned: Vec<_> = state.unassigned_tasks().collect();
                let task = unassigned[rng.random_range(0..unassigned.len())];
                let crane = c(rng.random_range(0..problem.num_cranes()));
                state = state
                    .apply_action(&problem, Action::new(crane, task))
                    .expect("unassigned task");

                let objective = DisjunctiveOracle::new()
                    .solve(&problem, state.constraints())
                    .objective()
                    .expect("no precedence pairs, always feasible");
                assert!(objective >= previous);
                previous = objective;
            }

            let solution = solution_of(&problem, &state).expect("feasible");
            assert!(solution.is_consistent_with(&problem));
            assert_eq!(solution.objective_value(), previous);
        }
    }
}
