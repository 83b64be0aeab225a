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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. Callbacks track the solver lifecycle, and a
//! monitor can stop the search via `SearchCommand` (default: Continue).
//!
//! Lifecycle
//! - enter → {command → step → prune | successors enqueued | solution}* → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Methods take `&mut self`; monitors are assumed single-threaded. Keep
//! callbacks lightweight, they sit on the hot path.

use crate::stats::BnbSolverStatistics;
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::{monitor::SearchCommand, state::AssignmentState};

/// Reasons for pruning a search state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The lower bound reached the incumbent.
    BoundDominated,
    /// The oracle found the constraint set infeasible.
    Infeasible,
    /// The oracle objective did not beat the incumbent.
    Incumbent,
    /// The assignment was already explored along another path.
    Explored,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::Incumbent => write!(f, "Incumbent"),
            PruneReason::Explored => write!(f, "Explored"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T, C> {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, problem: &Problem<T>, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Polled once per iteration, before the next node is popped.
    fn search_command(&mut self, _statistics: &BnbSolverStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every node popped from the fringe.
    fn on_step(&mut self, state: &AssignmentState<T, C>, statistics: &BnbSolverStatistics);
    /// Called when a search state is pruned.
    fn on_prune(
        &mut self,
        state: &AssignmentState<T, C>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    );
    /// Called after `state` was expanded and `count` children were pushed.
    fn on_successors_enqueued(
        &mut self,
        state: &AssignmentState<T, C>,
        count: usize,
        statistics: &BnbSolverStatistics,
    );
    /// Called when a new incumbent is found.
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics);
}

impl<T, C> std::fmt::Debug for dyn TreeSearchMonitor<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T, C> std::fmt::Display for dyn TreeSearchMonitor<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
