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

use qcs_core::num::SolverNumeric;
use qcs_model::solution::Solution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// We have proven that no feasible assignment exists in the searched space.
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(Solution<T>),
    /// We have found a feasible solution, but not proven its optimality.
    Feasible(Solution<T>),
    /// The solver terminated without finding a solution and
    /// without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn objective_value(&self) -> Option<T> {
        self.solution().map(Solution::objective_value)
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution().is_some()
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective_value())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective_value())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search space was exhausted with an incumbent.
    OptimalityProven,
    /// The search space was exhausted without any feasible goal state.
    InfeasibilityProven,
    /// The configured iteration budget was used up.
    IterationLimitReached,
    /// A monitor stopped the search (time limit, user request, ...).
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::IterationLimitReached => write!(f, "Iteration Limit Reached"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_model::index::TaskIndex;

    #[test]
    fn test_solution_accessors() {
        let solution = Solution::new(4i64, vec![vec![TaskIndex::new(0)]], vec![0], vec![4]);
        let result = SolverResult::Feasible(solution.clone());

        assert_eq!(result.objective_value(), Some(4));
        assert!(!result.is_optimal());
        assert_eq!(result.into_solution(), Some(solution));
        assert!(!SolverResult::<i64>::Unknown.has_solution());
    }

    #[test]
    fn test_display() {
        assert_eq!(SolverResult::<i64>::Infeasible.to_string(), "Infeasible");
        assert_eq!(
            TerminationReason::Aborted("time limit".into()).to_string(),
            "Aborted: time limit"
        );
    }
}
