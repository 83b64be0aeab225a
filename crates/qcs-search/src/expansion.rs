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

//! Expansion policy.
//!
//! Enumerates the legal `(crane, task)` actions of a state and turns them
//! into successor states. A candidate pairs an unassigned task with any crane
//! and must pass two filters:
//!
//! 1. Spatial eligibility. Under `SpatialEligibility::Zone` a crane only takes
//!    tasks within `ship_bay_span / num_cranes` bays of where it currently
//!    stands (strictly less). This is a tunable zoning heuristic that splits
//!    the ship into crane zones, not a physical constraint. It can cut every
//!    optimal assignment on adversarial instances. `Unrestricted` disables it.
//! 2. Precedence safety. Committing the task must not break a precedence pair
//!    `(i, j)` whose other endpoint is already assigned, read literally as
//!    `completion(i) + duration(j) <= completion(j)` on crane-load completion
//!    times.
//!
//! Rejected candidates are dropped silently. Actions are produced crane-major
//! and by ascending task index within a crane, so expansion is deterministic.

use crate::{
    oracle::ConstraintSet,
    state::{Action, AssignmentState},
};
use qcs_core::num::SolverNumeric;
use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
};

/// Step cost charged for every action.
pub const STEP_COST: u64 = 1;

/// The spatial filter applied to crane/task pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpatialEligibility {
    /// `|crane_bay - task_bay| < ship_bay_span / num_cranes`.
    #[default]
    Zone,
    /// Every crane may take every task.
    Unrestricted,
}

impl SpatialEligibility {
    /// Decides whether a crane `distance` bays away from a task may take it.
    ///
    /// The zone test is evaluated exactly as
    /// `distance * num_cranes < ship_bay_span`. When the span is zero (all
    /// tasks share one bay) the strict test admits nothing, so a crane
    /// standing on the bay stays eligible.
    #[inline]
    pub fn admits(&self, distance: u64, num_cranes: usize, ship_bay_span: u64) -> bool {
        match self {
            SpatialEligibility::Unrestricted => true,
            SpatialEligibility::Zone => {
                if ship_bay_span == 0 {
                    return distance == 0;
                }
                let cranes = u64::try_from(num_cranes).unwrap_or(u64::MAX);
                distance.saturating_mul(cranes) < ship_bay_span
            }
        }
    }
}

impl std::fmt::Display for SpatialEligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpatialEligibility::Zone => write!(f, "Zone"),
            SpatialEligibility::Unrestricted => write!(f, "Unrestricted"),
        }
    }
}

/// A successor produced by `ExpansionPolicy::expand`.
#[derive(Clone, Debug)]
pub struct Successor<T, C> {
    pub state: AssignmentState<T, C>,
    pub action: Action,
    pub cost: u64,
}

/// Enumerates legal actions and successor states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpansionPolicy {
    eligibility: SpatialEligibility,
}

impl ExpansionPolicy {
    #[inline]
    pub fn new(eligibility: SpatialEligibility) -> Self {
        Self { eligibility }
    }

    #[inline]
    pub fn eligibility(&self) -> SpatialEligibility {
        self.eligibility
    }

    /// Returns `true` if `action` passes both filters in `state`. The task
    /// is assumed unassigned.
    pub fn is_eligible<T, C>(
        &self,
        problem: &Problem<T>,
        state: &AssignmentState<T, C>,
        action: Action,
    ) -> bool
    where
        T: SolverNumeric,
    {
        let distance = state
            .current_location(action.crane())
            .abs_diff(problem.task_location(action.task()));
        self.eligibility
            .admits(distance, problem.num_cranes(), problem.ship_bay_span())
            && !violates_precedence(problem, state, action)
    }

    /// Legal actions of a single crane, by ascending task index.
    pub fn actions_for_crane<T, C>(
        &self,
        problem: &Problem<T>,
        state: &AssignmentState<T, C>,
        crane: CraneIndex,
    ) -> Vec<Action>
    where
        T: SolverNumeric,
    {
        state
            .unassigned_tasks()
            .map(|task| Action::new(crane, task))
            .filter(|&action| self.is_eligible(problem, state, action))
            .collect()
    }

    /// All legal actions, crane-major.
    pub fn actions<T, C>(&self, problem: &Problem<T>, state: &AssignmentState<T, C>) -> Vec<Action>
    where
        T: SolverNumeric,
    {
        problem
            .cranes()
            .flat_map(|crane| self.actions_for_crane(problem, state, crane))
            .collect()
    }

    /// Applies every legal action to a copy of `state`.
    pub fn expand<T, C>(
        &self,
        problem: &Problem<T>,
        state: &AssignmentState<T, C>,
    ) -> Vec<Successor<T, C>>
    where
        T: SolverNumeric,
        C: ConstraintSet<T>,
    {
        self.actions(problem, state)
            .into_iter()
            .filter_map(|action| match state.apply_action(problem, action) {
                Ok(child) => Some(Successor {
                    state: child,
                    action,
                    cost: STEP_COST,
                }),
                Err(err) => {
                    tracing::error!(%action, %err, "expansion proposed an invalid action");
                    None
                }
            })
            .collect()
    }
}

/// Checks whether appending `action.task()` to `action.crane()` breaks a
/// precedence pair with an already assigned partner.
fn violates_precedence<T, C>(
    problem: &Problem<T>,
    state: &AssignmentState<T, C>,
    action: Action,
) -> bool
where
    T: SolverNumeric,
{
    let task: TaskIndex = action.task();
    let duration = problem.task_duration(task);
    let completion = state.completion_time(action.crane()) + duration;

    let before_broken = problem.predecessors_of(task).iter().any(|&before| {
        state
            .task_completion_time(before)
            .is_some_and(|done| done + duration > completion)
    });
    if before_broken {
        return true;
    }

    problem.successors_of(task).iter().any(|&after| {
        state
            .task_completion_time(after)
            .is_some_and(|done| completion + problem.task_duration(after) > done)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::CraneLoads;
    use qcs_model::problem::ProblemBuilder;

    type State = AssignmentState<i64, CraneLoads<i64>>;

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

    #[test]
    fn test_zone_rule() {
        let zone = SpatialEligibility::Zone;
        // span 5, two cranes: distances below 2.5 are admitted
        assert!(zone.admits(0, 2, 5));
        assert!(zone.admits(2, 2, 5));
        assert!(!zone.admits(3, 2, 5));
        // exact boundary: 2 * 2 == 4 is not below 4
        assert!(!zone.admits(2, 2, 4));
        assert!(SpatialEligibility::Unrestricted.admits(100, 2, 5));
    }

    #[test]
    fn test_zone_rule_with_zero_span() {
        let zone = SpatialEligibility::Zone;
        assert!(zone.admits(0, 3, 0));
        assert!(!zone.admits(1, 3, 0));
    }

    #[test]
    fn test_zone_rule_with_extreme_bays() {
        let mut builder = ProblemBuilder::<i64>::new(2, 2);
        builder
            .set_task_location(t(0), i64::MIN)
            .set_task_location(t(1), i64::MAX)
            .set_crane_location(c(0), i64::MIN)
            .set_crane_location(c(1), i64::MAX);
        let problem = builder.build();
        assert_eq!(problem.ship_bay_span(), u64::MAX);

        let state = State::start(&problem);
        let policy = ExpansionPolicy::default();
        assert!(policy.is_eligible(&problem, &state, Action::new(c(0), t(0))));
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(0), t(1))));
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(1), t(0))));
        assert!(policy.is_eligible(&problem, &state, Action::new(c(1), t(1))));
    }

    #[test]
    fn test_root_actions_follow_zones() {
        let problem = scenario();
        let state = State::start(&problem);
        let actions = ExpansionPolicy::default().actions(&problem, &state);

        // crane 0 at bay 1 reaches bays 1..=3, crane 1 at bay 4 reaches bays 2..=6
        let expected = vec![
            Action::new(c(0), t(0)),
            Action::new(c(0), t(1)),
            Action::new(c(0), t(2)),
            Action::new(c(1), t(1)),
            Action::new(c(1), t(2)),
            Action::new(c(1), t(3)),
            Action::new(c(1), t(4)),
        ];
        assert_eq!(actions, expected);
    }

    #[test]
    fn test_locations_move_with_assignments() {
        let problem = scenario();
        let policy = ExpansionPolicy::default();
        let state = State::start(&problem)
            .apply_action(&problem, Action::new(c(0), t(2)))
            .expect("valid action");

        let actions = policy.actions_for_crane(&problem, &state, c(0));
        // crane 0 now stands on bay 3 and reaches bays 1..=5
        assert_eq!(
            actions,
            vec![
                Action::new(c(0), t(0)),
                Action::new(c(0), t(1)),
                Action::new(c(0), t(3)),
            ]
        );
    }

    #[test]
    fn test_expand_produces_unit_cost_children() {
        let problem = scenario();
        let state = State::start(&problem);
        let successors = ExpansionPolicy::new(SpatialEligibility::Unrestricted).expand(&problem, &state);

        assert_eq!(successors.len(), 10);
        for successor in &successors {
            assert_eq!(successor.cost, STEP_COST);
            assert_eq!(successor.state.num_assigned(), 1);
            assert!(successor.state.is_assigned(successor.action.task()));
        }
        assert_eq!(state.num_assigned(), 0);
    }

    #[test]
    fn test_goal_state_has_no_actions() {
        let problem = scenario();
        let state = State::from_sequences(&problem, &[vec![t(0), t(1), t(2)], vec![t(4), t(3)]])
            .expect("valid sequences");
        assert!(ExpansionPolicy::default().actions(&problem, &state).is_empty());
    }

    #[test]
    fn test_precedence_filter_uses_literal_inequality() {
        // Pair (0, 1): completion(0) + duration(1) <= completion(1).
        let mut builder = ProblemBuilder::<i64>::new(3, 2);
        builder
            .set_task_duration(t(0), 6)
            .set_task_duration(t(1), 4)
            .set_task_duration(t(2), 5)
            .add_precedence(t(0), t(1));
        let problem = builder.build();
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);

        let state = State::start(&problem)
            .apply_action(&problem, Action::new(c(0), t(0)))
            .expect("valid action");

        // On the idle crane task 1 would complete at 4 < 6 + 4.
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(1), t(1))));
        // Behind task 0 on the same crane it completes at 10 = 6 + 4.
        assert!(policy.is_eligible(&problem, &state, Action::new(c(0), t(1))));

        // After task 2 on crane 1 task 1 would complete at 9 < 10.
        let state = state
            .apply_action(&problem, Action::new(c(1), t(2)))
            .expect("valid action");
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(1), t(1))));
    }

    #[test]
    fn test_precedence_filter_checks_assigned_successors() {
        let mut builder = ProblemBuilder::<i64>::new(2, 2);
        builder
            .set_task_duration(t(0), 3)
            .set_task_duration(t(1), 2)
            .add_precedence(t(0), t(1));
        let problem = builder.build();
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);

        // Task 1 first completes at 2; any later task 0 completes at >= 3 and
        // 3 + 2 > 2.
        let state = State::start(&problem)
            .apply_action(&problem, Action::new(c(0), t(1)))
            .expect("valid action");
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(1), t(0))));
        assert!(!policy.is_eligible(&problem, &state, Action::new(c(0), t(0))));
        assert!(policy.actions(&problem, &state).is_empty());
    }
}
