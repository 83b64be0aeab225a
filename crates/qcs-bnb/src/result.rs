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

use crate::stats::BnbSolverStatistics;
use qcs_model::solution::Solution;
use qcs_search::{
    result::{SolverResult, TerminationReason},
    state::Action,
};

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    decisions: Vec<Action>,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T> {
    /// The fringe ran dry with an incumbent. `decisions` is the action path
    /// that produced it.
    #[inline]
    pub fn optimal(
        solution: Solution<T>,
        decisions: Vec<Action>,
        statistics: BnbSolverStatistics,
    ) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            decisions,
            statistics,
        }
    }

    /// The fringe ran dry without any feasible goal state.
    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            decisions: Vec::new(),
            statistics,
        }
    }

    /// A monitor stopped the search.
    #[inline]
    pub fn aborted<R>(
        solution: Option<Solution<T>>,
        decisions: Vec<Action>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        Self::interrupted(
            solution,
            decisions,
            TerminationReason::Aborted(reason.into()),
            statistics,
        )
    }

    /// The iteration budget ran out.
    #[inline]
    pub fn iteration_limit(
        solution: Option<Solution<T>>,
        decisions: Vec<Action>,
        statistics: BnbSolverStatistics,
    ) -> Self {
        Self::interrupted(
            solution,
            decisions,
            TerminationReason::IterationLimitReached,
            statistics,
        )
    }

    fn interrupted(
        solution: Option<Solution<T>>,
        decisions: Vec<Action>,
        termination_reason: TerminationReason,
        statistics: BnbSolverStatistics,
    ) -> Self {
        let (result, decisions) = match solution {
            Some(solution) => (SolverResult::Feasible(solution), decisions),
            None => (SolverResult::Unknown, Vec::new()),
        };

        Self {
            result,
            termination_reason,
            decisions,
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Consumes the outcome and returns the solver result.
    #[inline]
    pub fn into_result(self) -> SolverResult<T> {
        self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Actions from the root to the reported solution, empty without one.
    #[inline]
    pub fn decisions(&self) -> &[Action] {
        &self.decisions
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }
}
