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
use qcs_core::num::SolverNumeric;
use qcs_model::{problem::Problem, solution::Solution};
use std::time::{Duration, Instant};

/// Emits a progress event at most once per `log_interval`.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    best_objective: Option<T>,
}

impl<T> LogMonitor<T> {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            best_objective: None,
        }
    }
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(log_interval: {:?})", self.log_interval)
    }
}

impl<T> GraspMonitor<T> for LogMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, problem: &Problem<T>, _statistics: &GraspStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::info!(
            tasks = problem.num_tasks(),
            cranes = problem.num_cranes(),
            "GRASP started"
        );
    }

    fn on_end(&mut self, statistics: &GraspStatistics) {
        tracing::info!(
            elapsed = ?self.start_time.elapsed(),
            iterations = statistics.iterations,
            best = ?self.best_objective,
            "GRASP finished"
        );
    }

    fn on_iteration(&mut self, statistics: &GraspStatistics) {
        if self.last_log_time.elapsed() >= self.log_interval {
            tracing::info!(
                elapsed_secs = self.start_time.elapsed().as_secs_f64(),
                iterations = statistics.iterations,
                failed_constructions = statistics.constructions_failed,
                moves = statistics.moves_evaluated,
                best = ?self.best_objective,
                "progress"
            );
            self.last_log_time = Instant::now();
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &GraspStatistics) {
        self.best_objective = Some(solution.objective_value());
        tracing::info!(
            objective = %solution.objective_value(),
            iterations = statistics.iterations,
            "new incumbent"
        );
    }
}
