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

use crate::{monitor::grasp_monitor::GraspMonitor, stats::GraspStatistics};
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::monitor::SearchCommand;
use std::time::{Duration, Instant};

/// Stops the run once the wall-clock budget is spent.
///
/// The clock is read on every `check_interval`-th poll. GRASP iterations
/// are coarse, so the default reads it on every poll. An iteration that is
/// already running is allowed to finish.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    polls_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`. A `check_interval` of 0 is treated as 1.
    pub fn new(time_limit: Duration, check_interval: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            check_interval: check_interval.max(1),
            polls_since_last_check: 0,
        }
    }

    pub fn with_default_check_interval(time_limit: Duration) -> Self {
        Self::new(time_limit, 1)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> GraspMonitor<T> for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_start(&mut self, _problem: &Problem<T>, _statistics: &GraspStatistics) {
        self.start_time = Some(Instant::now());
        self.polls_since_last_check = 0;
    }

    fn on_end(&mut self, _statistics: &GraspStatistics) {
        self.start_time = None;
    }

    fn on_iteration(&mut self, _statistics: &GraspStatistics) {}

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &GraspStatistics) {}

    fn search_command(&mut self, _statistics: &GraspStatistics) -> SearchCommand {
        self.polls_since_last_check = self.polls_since_last_check.saturating_add(1);
        if self.polls_since_last_check < self.check_interval {
            return SearchCommand::Continue;
        }
        self.polls_since_last_check = 0;

        match self.start_time {
            Some(start) if start.elapsed() >= self.time_limit => SearchCommand::Terminate(format!(
                "Time limit of {:.3} seconds exceeded",
                self.time_limit.as_secs_f64()
            )),
            _ => SearchCommand::Continue,
        }
    }
}
