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

//! Stochastic swap descent.
//!
//! Crane by crane, two distinct positions of the crane's sequence are swapped
//! at random and the neighbour is handed to the oracle. A neighbour is kept
//! iff it is oracle-feasible and strictly better than the working solution,
//! which resets that crane's budget of `early_stop` non-improving moves.
//!
//! Neighbours already seen during the run (including the start) are memo
//! hits: they count as non-improving and skip the oracle.

use crate::stats::GraspStatistics;
use qcs_core::num::SolverNumeric;
use qcs_model::{
    index::{CraneIndex, TaskIndex},
    problem::Problem,
};
use qcs_search::{
    oracle::{ConstraintSet, Oracle, OracleSolution, OracleStatus},
    state::{Assignment, AssignmentState},
};
use rand::Rng;
use rustc_hash::FxHashSet;

/// The working solution of a local-search run. `schedule` is `None` while no
/// feasible schedule is known for `state`.
#[derive(Clone, Debug)]
pub struct Incumbent<T, C> {
    pub state: AssignmentState<T, C>,
    pub schedule: Option<OracleSolution<T>>,
}

impl<T, C> Incumbent<T, C>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn objective(&self) -> Option<T> {
        self.schedule.as_ref().map(OracleSolution::objective)
    }
}

/// Runs the swap descent from `start`.
pub fn improve<T, O, R>(
    problem: &Problem<T>,
    oracle: &mut O,
    start: Incumbent<T, O::Constraints>,
    early_stop: u64,
    rng: &mut R,
    statistics: &mut GraspStatistics,
) -> Incumbent<T, O::Constraints>
where
    T: SolverNumeric,
    O: Oracle<T>,
    R: Rng + ?Sized,
{
    let mut memo: FxHashSet<Assignment> = FxHashSet::default();
    memo.insert(start.state.assignment().clone());
    let mut current = start;

    for crane in problem.cranes() {
        let mut non_improving = 0;
        while non_improving < early_stop {
            let Some(sequences) = swap_neighbour(current.state.assignment(), crane, rng) else {
                break;
            };

            if !memo.insert(Assignment::from(sequences.clone())) {
                statistics.on_memo_hit();
                non_improving += 1;
                continue;
            }

            match evaluate(problem, oracle, &sequences, current.objective(), statistics) {
                Some(better) => {
                    statistics.on_move_accepted();
                    current = better;
                    non_improving = 0;
                }
                None => non_improving += 1,
            }
        }
    }

    current
}

/// A copy of the sequences with two distinct positions of `crane` swapped,
/// or `None` if the crane holds fewer than two tasks.
fn swap_neighbour<R>(
    assignment: &Assignment,
    crane: CraneIndex,
    rng: &mut R,
) -> Option<Vec<Vec<TaskIndex>>>
where
    R: Rng + ?Sized,
{
    let len = assignment.sequence(crane).len();
    if len < 2 {
        return None;
    }

    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }

    let mut sequences = assignment.sequences().to_vec();
    sequences[crane.get()].swap(first, second);
    Some(sequences)
}

/// Rebuilds the neighbour and asks the oracle for a schedule strictly better
/// than `bound`.
fn evaluate<T, O>(
    problem: &Problem<T>,
    oracle: &mut O,
    sequences: &[Vec<TaskIndex>],
    bound: Option<T>,
    statistics: &mut GraspStatistics,
) -> Option<Incumbent<T, O::Constraints>>
where
    T: SolverNumeric,
    O: Oracle<T>,
{
    let state = match AssignmentState::<T, O::Constraints>::from_sequences(problem, sequences) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(%err, "swap produced an invalid assignment");
            return None;
        }
    };

    let mut constraints = state.constraints().clone();
    if let Some(bound) = bound {
        constraints.tighten_upper_bound(bound);
    }

    statistics.on_move_evaluated();
    statistics.on_oracle_call();
    match oracle.solve(problem, &constraints) {
        OracleStatus::Feasible(schedule)
            if bound.is_none_or(|bound| schedule.objective() < bound) =>
        {
            Some(Incumbent {
                state,
                schedule: Some(schedule),
            })
        }
        _ => None,
    }
}
