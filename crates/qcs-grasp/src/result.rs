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

//! GRASP outcome.
//!
//! GRASP never proves anything: a run ends with the best oracle-feasible
//! solution as `SolverResult::Feasible`, or `SolverResult::Unknown` when no
//! construction ever produced one.

use crate::stats::GraspStatistics;
use qcs_model::solution::Solution;
use qcs_search::result::{SolverResult, TerminationReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraspOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: GraspStatistics,
}

impl<T> GraspOutcome<T> {
    /// The iteration budget ran out.
    #[inline]
    pub fn iteration_limit(solution: Option<Solution<T>>, statistics: GraspStatistics) -> Self {
        Self::new(solution, TerminationReason::IterationLimitReached, statistics)
    }

    /// A monitor stopped the run.
    #[inline]
    pub fn aborted<R>(solution: Option<Solution<T>>, reason: R, statistics: GraspStatistics) -> Self
    where
        R: Into<String>,
    {
        Self::new(
            solution,
            TerminationReason::Aborted(reason.into()),
            statistics,
        )
    }

    fn new(
        solution: Option<Solution<T>>,
        termination_reason: TerminationReason,
        statistics: GraspStatistics,
    ) -> Self {
        Self {
            result: solution.map_or(SolverResult::Unknown, SolverResult::Feasible),
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn into_result(self) -> SolverResult<T> {
        self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &GraspStatistics {
        &self.statistics
    }
}
