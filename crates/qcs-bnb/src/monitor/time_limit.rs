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

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    stats::BnbSolverStatistics,
};
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::{monitor::SearchCommand, state::AssignmentState};
use std::time::{Duration, Instant};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` commands to keep the
/// overhead down, so the search may overrun the budget by up to that many
/// iterations.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`. A `check_interval` of 0 is treated as 1.
    pub fn new(time_limit: Duration, check_interval: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` that checks the clock every 64 iterations.
    pub fn with_default_check_interval(time_limit: Duration) -> Self {
        Self::new(time_limit, 64)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T, C> TreeSearchMonitor<T, C> for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _problem: &Problem<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.start_time = None;
    }

    fn search_command(&mut self, _statistics: &BnbSolverStatistics) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() >= self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {:.3} seconds exceeded",
                    self.time_limit.as_secs_f64()
                ));
            }
        }

        SearchCommand::Continue
    }

    fn on_step(&mut self, _state: &AssignmentState<T, C>, _statistics: &BnbSolverStatistics) {}

    fn on_prune(
        &mut self,
        _state: &AssignmentState<T, C>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_successors_enqueued(
        &mut self,
        _state: &AssignmentState<T, C>,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_model::problem::ProblemBuilder;
    use qcs_search::oracle::CraneLoads;

    fn command(monitor: &mut TimeLimitMonitor) -> SearchCommand {
        TreeSearchMonitor::<i64, CraneLoads<i64>>::search_command(
            monitor,
            &BnbSolverStatistics::default(),
        )
    }

    #[test]
    fn test_zero_budget_terminates_on_first_check() {
        let problem = ProblemBuilder::<i64>::new(1, 1).build();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 2);
        TreeSearchMonitor::<i64, CraneLoads<i64>>::on_enter_search(
            &mut monitor,
            &problem,
            &BnbSolverStatistics::default(),
        );

        assert_eq!(command(&mut monitor), SearchCommand::Continue);
        assert!(matches!(command(&mut monitor), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_not_started_never_terminates() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);
        assert_eq!(command(&mut monitor), SearchCommand::Continue);
    }
}
