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

//! Greedy randomized construction.
//!
//! Starting from the empty state, the least-loaded crane that still has an
//! eligible action picks its next task. Candidate tasks are weighted by
//! proximity, `1 / (|crane bay - task bay| + 1)`, filtered to a restricted
//! candidate list of weights at least `alpha` times the best one, and drawn
//! by roulette over their weights.

use qcs_core::num::SolverNumeric;
use qcs_model::{index::CraneIndex, problem::Problem};
use qcs_search::{
    expansion::ExpansionPolicy,
    oracle::ConstraintSet,
    state::{Action, AssignmentState},
};
use rand::Rng;

/// Builds one complete assignment, or `None` when every crane runs out of
/// eligible actions before all tasks are assigned.
pub fn construct<T, C, R>(
    problem: &Problem<T>,
    policy: &ExpansionPolicy,
    alpha: f64,
    rng: &mut R,
) -> Option<AssignmentState<T, C>>
where
    T: SolverNumeric,
    C: ConstraintSet<T>,
    R: Rng + ?Sized,
{
    let mut state = AssignmentState::<T, C>::start(problem);

    while !state.is_goal() {
        let (crane, actions) = next_crane(problem, policy, &state)?;

        let here = state.current_location(crane);
        let weights: Vec<f64> = actions
            .iter()
            .map(|action| proximity_weight(here, problem.task_location(action.task())))
            .collect();
        let candidates = restricted_candidates(&weights, alpha);
        let picked = roulette(&candidates, &weights, rng)?;

        state = match state.apply_action(problem, actions[picked]) {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(
                    action = %actions[picked],
                    %err,
                    "construction picked an invalid action"
                );
                return None;
            }
        };
    }

    Some(state)
}

/// The crane with the smallest completion time among those with at least one
/// eligible action, lowest index first on ties, together with its actions.
fn next_crane<T, C>(
    problem: &Problem<T>,
    policy: &ExpansionPolicy,
    state: &AssignmentState<T, C>,
) -> Option<(CraneIndex, Vec<Action>)>
where
    T: SolverNumeric,
{
    problem
        .cranes()
        .filter_map(|crane| {
            let actions = policy.actions_for_crane(problem, state, crane);
            (!actions.is_empty()).then_some((crane, actions))
        })
        .min_by_key(|(crane, _)| state.completion_time(*crane))
}

#[inline]
fn proximity_weight(crane_location: i64, task_location: i64) -> f64 {
    1.0 / (crane_location.abs_diff(task_location) as f64 + 1.0)
}

/// Positions of the weights that reach `alpha` times the largest weight.
/// `alpha` is clamped to `[0, 1]`, so the best weight always qualifies.
pub(crate) fn restricted_candidates(weights: &[f64], alpha: f64) -> Vec<usize> {
    let best = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = alpha.clamp(0.0, 1.0) * best;
    weights
        .iter()
        .enumerate()
        .filter(|&(_, &weight)| weight >= threshold)
        .map(|(position, _)| position)
        .collect()
}

/// Draws one of `candidates` with probability proportional to its weight.
pub(crate) fn roulette<R>(candidates: &[usize], weights: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let total: f64 = candidates.iter().map(|&c| weights[c]).sum();
    let mut ticket = rng.random::<f64>() * total;
    for &candidate in candidates {
        ticket -= weights[candidate];
        if ticket < 0.0 {
            return Some(candidate);
        }
    }
    // Rounding can leave a sliver past the last candidate.
    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario;
    use qcs_model::index::TaskIndex;
    use qcs_search::{expansion::SpatialEligibility, oracle::CraneLoads};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_restricted_candidates_filters_by_alpha() {
        let weights = [1.0, 0.5, 0.25, 0.2];
        assert_eq!(restricted_candidates(&weights, 0.4), vec![0, 1]);
        assert_eq!(restricted_candidates(&weights, 0.0), vec![0, 1, 2, 3]);
        assert_eq!(restricted_candidates(&weights, 1.0), vec![0]);
        assert!(restricted_candidates(&[], 0.5).is_empty());
    }

    #[test]
    fn test_restricted_candidates_clamps_alpha() {
        let weights = [0.5, 1.0, 0.25];
        assert_eq!(restricted_candidates(&weights, 1.5), vec![1]);
        assert_eq!(restricted_candidates(&weights, f64::INFINITY), vec![1]);
        assert_eq!(restricted_candidates(&weights, -2.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_roulette_only_returns_candidates() {
        let weights = [1.0, 0.5, 0.25, 0.2];
        let candidates = [1, 3];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = [0usize; 4];
        for _ in 0..500 {
            let picked = roulette(&candidates, &weights, &mut rng).unwrap();
            seen[picked] += 1;
        }
        assert_eq!(seen[0], 0);
        assert_eq!(seen[2], 0);
        assert!(seen[1] > 0 && seen[3] > 0);
        assert!(seen[1] > seen[3]);
        assert_eq!(roulette(&[], &weights, &mut rng), None);
    }

    #[test]
    fn test_proximity_weight() {
        assert_eq!(proximity_weight(4, 4), 1.0);
        assert_eq!(proximity_weight(1, 4), 0.25);
        assert_eq!(proximity_weight(6, 3), 0.25);
        assert!(proximity_weight(i64::MIN, i64::MAX) > 0.0);
        assert!(proximity_weight(i64::MAX, i64::MIN) > 0.0);
    }

    #[test]
    fn test_constructions_are_complete_assignments() {
        let problem = scenario();
        let policy = ExpansionPolicy::default();
        let mut successes = 0;

        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let Some(state) =
                construct::<i64, CraneLoads<i64>, _>(&problem, &policy, 0.4, &mut rng)
            else {
                continue;
            };
            successes += 1;

            assert!(state.is_goal());
            let mut tasks: Vec<usize> = state
                .assignment()
                .sequences()
                .iter()
                .flatten()
                .map(|task| task.get())
                .collect();
            tasks.sort_unstable();
            assert_eq!(tasks, vec![0, 1, 2, 3, 4]);
        }

        assert!(successes > 0);
    }

    #[test]
    fn test_unrestricted_construction_never_fails() {
        let problem = scenario();
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let state = construct::<i64, CraneLoads<i64>, _>(&problem, &policy, 0.4, &mut rng);
            assert!(state.is_some_and(|s| s.is_goal()));
        }
    }

    #[test]
    fn test_first_pick_goes_to_lowest_index_crane() {
        // Both cranes idle: crane 0 moves first and, with alpha = 1, takes
        // the task on its own bay.
        let problem = scenario();
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let state =
            construct::<i64, CraneLoads<i64>, _>(&problem, &policy, 1.0, &mut rng).unwrap();
        assert_eq!(state.sequence(CraneIndex::new(0))[0], TaskIndex::new(0));
    }
}
