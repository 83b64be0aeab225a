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

use crate::stats::GraspStatistics;
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::monitor::SearchCommand;

/// Observes a GRASP run.
///
/// `search_command` is polled once before every iteration; the first
/// `Terminate` ends the run with the incumbent found so far.
pub trait GraspMonitor<T> {
    fn name(&self) -> &str;

    fn on_start(&mut self, problem: &Problem<T>, statistics: &GraspStatistics);

    fn on_end(&mut self, statistics: &GraspStatistics);

    /// Called after an iteration finished, including iterations whose
    /// construction failed.
    fn on_iteration(&mut self, statistics: &GraspStatistics);

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &GraspStatistics);

    fn search_command(&mut self, _statistics: &GraspStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<T> std::fmt::Debug for dyn GraspMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GraspMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn GraspMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GraspMonitor({})", self.name())
    }
}
