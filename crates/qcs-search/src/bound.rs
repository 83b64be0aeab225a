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

//! Lower bounds and dominance.
//!
//! `lower_bound` is the classic two-part makespan bound
//! `max(max_k C_k, ceil((sum_k C_k + sum_{r in R} p_r) / K))`. No crane can
//! finish before its committed load, and the busiest crane carries at least
//! the average of the total work. Oracle objectives only add waiting time on
//! top of crane loads, so the bound never exceeds the objective of any
//! completion.
//!
//! Dominance is pluggable through `DominanceRule`. `ParetoDominance` compares
//! sibling states with the same signature (the same task set on every crane,
//! in any order) and drops those whose crane-load vector is Pareto-dominated.
//! `NoDominance` keeps everything. Either choice leaves the optimum found by
//! branch-and-bound unchanged.

use crate::{expansion::Successor, state::AssignmentState};
use qcs_core::num::{SolverNumeric, div_ceil_non_negative};
use qcs_model::{index::TaskIndex, problem::Problem};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Computes the two-part lower bound of `state`.
pub fn lower_bound<T, C>(problem: &Problem<T>, state: &AssignmentState<T, C>) -> T
where
    T: SolverNumeric,
{
    let committed_max = state.objective();
    let remaining: T = state
        .unassigned_tasks()
        .map(|task| problem.task_duration(task))
        .sum();
    let total = state.total_load() + remaining;

    match T::from_usize(problem.num_cranes()) {
        Some(cranes) if cranes.is_positive() && !total.is_negative() => {
            committed_max.max(div_ceil_non_negative(total, cranes))
        }
        _ => committed_max,
    }
}

/// The per-crane task sets of a state, each sorted ascending.
pub type Signature = SmallVec<[SmallVec<[TaskIndex; 8]>; 4]>;

/// Builds the dominance signature of `state`.
pub fn signature<T, C>(state: &AssignmentState<T, C>) -> Signature
where
    T: SolverNumeric,
{
    state
        .assignment()
        .sequences()
        .iter()
        .map(|sequence| {
            let mut tasks: SmallVec<[TaskIndex; 8]> = sequence.iter().copied().collect();
            tasks.sort_unstable();
            tasks
        })
        .collect()
}

/// `a` Pareto-dominates `b`: componentwise `<=` and strictly `<` somewhere.
pub fn pareto_dominates<T>(a: &[T], b: &[T]) -> bool
where
    T: PartialOrd,
{
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| x <= y)
        && a.iter().zip(b).any(|(x, y)| x < y)
}

/// Returns `true` if `a` dominates `b`. States with different signatures are
/// incomparable.
pub fn dominates<T, C>(a: &AssignmentState<T, C>, b: &AssignmentState<T, C>) -> bool
where
    T: SolverNumeric,
{
    pareto_dominates(a.completion_times(), b.completion_times()) && signature(a) == signature(b)
}

/// Removes dominated siblings before they are bounded and enqueued.
pub trait DominanceRule<T, C> {
    /// Returns the name of the rule.
    fn name(&self) -> &str;

    /// Drops dominated successors in place and returns how many were dropped.
    fn retain_non_dominated(&mut self, successors: &mut Vec<Successor<T, C>>) -> usize;
}

/// A rule that never prunes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDominance;

impl<T, C> DominanceRule<T, C> for NoDominance {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoDominance"
    }

    #[inline(always)]
    fn retain_non_dominated(&mut self, _successors: &mut Vec<Successor<T, C>>) -> usize {
        0
    }
}

/// Signature-grouped Pareto dominance on crane-load vectors.
///
/// Equal load vectors do not dominate each other, so of two equivalent
/// siblings both survive. Loads are plain duration sums, so siblings with
/// equal signatures carry equal loads and the rule never drops anything
/// during search. Drops only happen for states with equal signatures but
/// order-dependent loads, which `mark_dominated` covers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParetoDominance;

impl<T, C> DominanceRule<T, C> for ParetoDominance
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "ParetoDominance"
    }

    fn retain_non_dominated(&mut self, successors: &mut Vec<Successor<T, C>>) -> usize {
        if successors.len() < 2 {
            return 0;
        }

        let signatures: Vec<Signature> = successors
            .iter()
            .map(|successor| signature(&successor.state))
            .collect();
        let loads: Vec<&[T]> = successors
            .iter()
            .map(|successor| successor.state.completion_times())
            .collect();
        let dominated = mark_dominated(&signatures, &loads);

        let before = successors.len();
        let mut flags = dominated.into_iter();
        successors.retain(|_| !flags.next().unwrap_or(false));
        before - successors.len()
    }
}

/// Flags every entry whose load vector is Pareto-dominated by another entry
/// with the same signature.
pub fn mark_dominated<T>(signatures: &[Signature], loads: &[&[T]]) -> Vec<bool>
where
    T: PartialOrd,
{
    debug_assert_eq!(
        signatures.len(),
        loads.len(),
        "called `mark_dominated` with {} signatures but {} load vectors",
        signatures.len(),
        loads.len()
    );

    let mut groups: FxHashMap<&Signature, SmallVec<[usize; 4]>> = FxHashMap::default();
    for (index, signature) in signatures.iter().enumerate() {
        groups.entry(signature).or_default().push(index);
    }

    let mut dominated = vec![false; signatures.len()];
    for members in groups.values().filter(|members| members.len() > 1) {
        for &candidate in members {
            dominated[candidate] = members.iter().any(|&other| {
                other != candidate && pareto_dominates(loads[other], loads[candidate])
            });
        }
    }
    dominated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        expansion::{ExpansionPolicy, SpatialEligibility},
        oracle::{CraneLoadOracle, CraneLoads, Oracle},
        state::Action,
    };
    use qcs_model::{index::CraneIndex, problem::ProblemBuilder};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    type State = AssignmentState<i64, CraneLoads<i64>>;

    fn t(i: usize) -> TaskIndex {
        TaskIndex::new(i)
    }

    fn c(i: usize) -> CraneIndex {
        CraneIndex::new(i)
    }

    fn random_problem(rng: &mut ChaCha8Rng, num_tasks: usize) -> Problem<i64> {
        let mut builder = ProblemBuilder::<i64>::new(num_tasks, 2);
        for i in 0..num_tasks {
            builder
                .set_task_duration(t(i), rng.random_range(1..=20))
                .set_task_location(t(i), rng.random_range(0..8));
        }
        builder.set_crane_location(c(0), 0).set_crane_location(c(1), 7);
        builder.build()
    }

    /// Best crane-load makespan over every completion of `state`.
    fn best_completion(problem: &Problem<i64>, state: &State) -> i64 {
        if state.is_goal() {
            return CraneLoadOracle::new()
                .solve(problem, state.constraints())
                .objective()
                .expect("relaxation is feasible without bound");
        }
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);
        policy
            .expand(problem, state)
            .into_iter()
            .map(|successor| best_completion(problem, &successor.state))
            .min()
            .expect("unrestricted expansion of a non-goal state is non-empty")
    }

    #[test]
    fn test_lower_bound_of_scenario_root() {
        let mut builder = ProblemBuilder::<i64>::new(5, 2);
        for (i, &p) in [8, 10, 20, 5, 30].iter().enumerate() {
            builder.set_task_duration(t(i), p);
        }
        let problem = builder.build();
        let root = State::start(&problem);
        assert_eq!(lower_bound(&problem, &root), 37);

        let state = root
            .apply_action(&problem, Action::new(c(0), t(4)))
            .and_then(|s| s.apply_action(&problem, Action::new(c(0), t(2))))
            .expect("valid actions");
        assert_eq!(lower_bound(&problem, &state), 50);
    }

    #[test]
    fn test_lower_bound_is_sound_on_random_partial_states() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..25 {
            let num_tasks = rng.random_range(2..=6);
            let problem = random_problem(&mut rng, num_tasks);
            let depth = rng.random_range(0..=num_tasks);

            let mut state = State::start(&problem);
            for _ in 0..depth {
                let unassigned: Vec<_> = state.unassigned_tasks().collect();
                let task = unassigned[rng.random_range(0..unassigned.len())];
                let crane = c(rng.random_range(0..2));
                state = state
                    .apply_action(&problem, Action::new(crane, task))
                    .expect("unassigned task");
            }

            let bound = lower_bound(&problem, &state);
            let best = best_completion(&problem, &state);
            assert!(
                bound <= best,
                "lower bound {bound} exceeds best completion {best} for {state}"
            );
        }
    }

    #[test]
    fn test_pareto_dominates() {
        assert!(pareto_dominates(&[1, 2], &[1, 3]));
        assert!(!pareto_dominates(&[1, 3], &[1, 3]));
        assert!(!pareto_dominates(&[0, 4], &[1, 3]));
        assert!(!pareto_dominates(&[1], &[1, 3]));
    }

    #[test]
    fn test_signature_ignores_order_within_crane() {
        let mut builder = ProblemBuilder::<i64>::new(3, 2);
        builder.set_task_duration(t(2), 4);
        let problem = builder.build();

        let a = State::from_sequences(&problem, &[vec![t(0), t(2)], vec![t(1)]]).expect("valid");
        let b = State::from_sequences(&problem, &[vec![t(2), t(0)], vec![t(1)]]).expect("valid");
        let d = State::from_sequences(&problem, &[vec![t(0)], vec![t(1), t(2)]]).expect("valid");

        assert_eq!(signature(&a), signature(&b));
        assert_ne!(signature(&a), signature(&d));
        assert_ne!(a, b);
        // same task sets give the same loads, so neither dominates
        assert!(!dominates(&a, &b));
        assert!(!dominates(&b, &a));
        // different task sets are incomparable even with smaller loads
        assert!(!dominates(&d, &a));
    }

    fn sig(sets: &[&[usize]]) -> Signature {
        sets.iter()
            .map(|set| set.iter().copied().map(t).collect())
            .collect()
    }

    #[test]
    fn test_mark_dominated_drops_within_signature_groups() {
        let signatures = [
            sig(&[&[0, 2], &[1]]),
            sig(&[&[0, 2], &[1]]),
            sig(&[&[0, 2], &[1]]),
            sig(&[&[0], &[1, 2]]),
        ];
        let loads: [&[i64]; 4] = [&[9, 4], &[7, 4], &[7, 4], &[1, 1]];

        // entry 0 loses to 1 and 2; 1 and 2 tie; 3 sits in its own group
        assert_eq!(
            mark_dominated(&signatures, &loads),
            vec![true, false, false, false]
        );
    }

    #[test]
    fn test_mark_dominated_keeps_incomparable_loads() {
        let signatures = [sig(&[&[0], &[1]]), sig(&[&[0], &[1]])];
        let loads: [&[i64]; 2] = [&[3, 5], &[5, 3]];
        assert_eq!(mark_dominated(&signatures, &loads), vec![false, false]);
        assert!(mark_dominated::<i64>(&[], &[]).is_empty());
    }

    #[test]
    fn test_rules_keep_distinct_siblings() {
        let mut builder = ProblemBuilder::<i64>::new(4, 2);
        for i in 0..4 {
            builder.set_task_duration(t(i), (i as i64) + 1);
        }
        let problem = builder.build();
        let root = State::start(&problem);
        let policy = ExpansionPolicy::new(SpatialEligibility::Unrestricted);

        let mut pareto = policy.expand(&problem, &root);
        let mut none = pareto.clone();
        let expected = pareto.len();

        assert_eq!(ParetoDominance.retain_non_dominated(&mut pareto), 0);
        assert_eq!(NoDominance.retain_non_dominated(&mut none), 0);
        assert_eq!(pareto.len(), expected);
        assert_eq!(none.len(), expected);
    }
}
