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

//! The GRASP driver.
//!
//! Each iteration constructs one complete assignment, has the oracle
//! schedule it, runs the swap descent on it and keeps the result if it is
//! feasible and strictly better than the incumbent. Failed constructions
//! still count as iterations. The run stops after `max_iterations`
//! iterations or when a monitor asks it to.

use crate::{
    config::GraspConfig,
    construction::construct,
    local_search::{Incumbent, improve},
    monitor::grasp_monitor::GraspMonitor,
    result::GraspOutcome,
    stats::GraspStatistics,
};
use qcs_core::num::SolverNumeric;
use qcs_model::solution::Solution;
use qcs_search::{
    monitor::SearchCommand,
    oracle::Oracle,
    result::TerminationReason,
    search_problem::QcScheduling,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug, Default)]
pub struct GraspSolver {
    config: GraspConfig,
}

impl GraspSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: GraspConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    #[tracing::instrument(
        level = "debug",
        name = "grasp",
        skip_all,
        fields(
            alpha = self.config.alpha(),
            early_stop = self.config.early_stop(),
            seed = self.config.seed(),
            oracle = oracle.name()
        )
    )]
    pub fn solve<T, O, M>(
        &self,
        search: &QcScheduling<'_, T>,
        oracle: &mut O,
        mut monitor: M,
    ) -> GraspOutcome<T>
    where
        T: SolverNumeric,
        O: Oracle<T>,
        M: GraspMonitor<T>,
    {
        GraspSearchSession::new(&self.config, search, oracle, &mut monitor).run()
    }
}

struct GraspSearchSession<'a, 'p, T, O, M> {
    config: &'a GraspConfig,
    search: &'a QcScheduling<'p, T>,
    oracle: &'a mut O,
    monitor: &'a mut M,
    rng: ChaCha8Rng,
    best_solution: Option<Solution<T>>,
    stats: GraspStatistics,
    start_time: std::time::Instant,
}

impl<'a, 'p, T, O, M> GraspSearchSession<'a, 'p, T, O, M>
where
    T: SolverNumeric,
    O: Oracle<T>,
    M: GraspMonitor<T>,
{
    fn new(
        config: &'a GraspConfig,
        search: &'a QcScheduling<'p, T>,
        oracle: &'a mut O,
        monitor: &'a mut M,
    ) -> Self {
        Self {
            config,
            search,
            oracle,
            monitor,
            rng: ChaCha8Rng::seed_from_u64(config.seed()),
            best_solution: None,
            stats: GraspStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> GraspOutcome<T> {
        self.monitor.on_start(self.search.problem(), &self.stats);

        let termination_reason = loop {
            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&self.stats) {
                break TerminationReason::Aborted(msg);
            }
            if self.stats.iterations >= self.config.max_iterations() {
                break TerminationReason::IterationLimitReached;
            }

            self.stats.on_iteration();
            self.iterate();
            self.monitor.on_iteration(&self.stats);
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_end(&self.stats);

        match termination_reason {
            TerminationReason::Aborted(msg) => {
                GraspOutcome::aborted(self.best_solution, msg, self.stats)
            }
            _ => GraspOutcome::iteration_limit(self.best_solution, self.stats),
        }
    }

    fn iterate(&mut self) {
        let problem = self.search.problem();

        let Some(state) = construct::<T, O::Constraints, _>(
            problem,
            self.search.policy(),
            self.config.alpha(),
            &mut self.rng,
        ) else {
            self.stats.on_construction_failed();
            tracing::trace!(iteration = self.stats.iterations, "construction failed");
            return;
        };

        self.stats.on_oracle_call();
        let schedule = self
            .oracle
            .solve(problem, state.constraints())
            .into_solution();

        let result = improve(
            problem,
            &mut *self.oracle,
            Incumbent { state, schedule },
            self.config.early_stop(),
            &mut self.rng,
            &mut self.stats,
        );

        if let Some(schedule) = &result.schedule
            && self
                .best_objective()
                .is_none_or(|best| schedule.objective() < best)
        {
            let solution = result.state.to_solution(problem, schedule);
            self.stats.on_solution_found();
            tracing::debug!(
                objective = %solution.objective_value(),
                iteration = self.stats.iterations,
                "new incumbent"
            );
            self.monitor.on_solution_found(&solution, &self.stats);
            self.best_solution = Some(solution);
        }
    }

    #[inline]
    fn best_objective(&self) -> Option<T> {
        self.best_solution.as_ref().map(Solution::objective_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{build, scenario},
        monitor::{no_op::NoOperationMonitor, time_limit::TimeLimitMonitor},
    };
    use qcs_model::{index::TaskIndex, problem::Problem};
    use qcs_oracle::disjunctive::DisjunctiveOracle;
    use qcs_search::{
        expansion::{ExpansionPolicy, SpatialEligibility},
        oracle::CraneLoadOracle,
        result::SolverResult,
    };
    use std::time::Duration;

    fn run(
        problem: &Problem<i64>,
        eligibility: SpatialEligibility,
        config: GraspConfig,
    ) -> GraspOutcome<i64> {
        let search = QcScheduling::new(problem, ExpansionPolicy::new(eligibility));
        GraspSolver::with_config(config).solve(
            &search,
            &mut DisjunctiveOracle::new(),
            NoOperationMonitor,
        )
    }

    #[test]
    fn test_scenario_with_fixed_seed_is_feasible() {
        let problem = scenario();
        let config = GraspConfig::new().with_seed(7).with_max_iterations(200);
        let outcome = run(&problem, SpatialEligibility::Zone, config);

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::IterationLimitReached
        );
        let SolverResult::Feasible(solution) = outcome.result() else {
            panic!("expected a feasible solution, got {}", outcome.result());
        };
        assert!(solution.objective_value() >= 37);
        assert!(solution.is_consistent_with(&problem));

        let stats = outcome.statistics();
        assert_eq!(stats.iterations, 200);
        assert!(stats.constructions_failed < 200);
        assert!(stats.solutions_found >= 1);
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = scenario();
        let config = GraspConfig::new().with_seed(11).with_max_iterations(50);
        let a = run(&problem, SpatialEligibility::Unrestricted, config);
        let b = run(&problem, SpatialEligibility::Unrestricted, config);

        assert_eq!(a.result(), b.result());
        assert_eq!(a.statistics().oracle_calls, b.statistics().oracle_calls);
        assert_eq!(a.statistics().moves_accepted, b.statistics().moves_accepted);
    }

    #[test]
    fn test_unrestricted_never_fails_construction() {
        let problem = scenario();
        let config = GraspConfig::new().with_seed(3).with_max_iterations(20);
        let outcome = run(&problem, SpatialEligibility::Unrestricted, config);

        assert_eq!(outcome.statistics().constructions_failed, 0);
        assert!(outcome.result().has_solution());
    }

    #[test]
    fn test_precedence_solutions_are_consistent() {
        let problem = build(
            &[4, 6, 3, 5, 2, 7],
            &[1, 2, 3, 4, 5, 6],
            &[1, 6],
            &[(2, 3)],
            &[(0, 2), (5, 3)],
        );
        let config = GraspConfig::new().with_seed(5).with_max_iterations(100);
        let outcome = run(&problem, SpatialEligibility::Unrestricted, config);

        let solution = outcome.result().solution().expect("a feasible solution");
        assert!(solution.is_consistent_with(&problem));
        let t = TaskIndex::new;
        assert!(solution.start_time(t(2)) >= solution.completion_time(t(0)));
        assert!(solution.start_time(t(3)) >= solution.completion_time(t(5)));
    }

    #[test]
    fn test_zero_time_limit_aborts_before_first_iteration() {
        let problem = scenario();
        let search = QcScheduling::new(&problem, ExpansionPolicy::default());
        let outcome: GraspOutcome<i64> = GraspSolver::new().solve(
            &search,
            &mut DisjunctiveOracle::new(),
            TimeLimitMonitor::with_default_check_interval(Duration::ZERO),
        );

        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.statistics().iterations, 0);
    }

    #[test]
    fn test_alpha_above_one_still_constructs() {
        let problem = scenario();
        let config = GraspConfig::new()
            .with_alpha(1.5)
            .with_seed(2)
            .with_max_iterations(50);
        let outcome = run(&problem, SpatialEligibility::Unrestricted, config);

        assert_eq!(outcome.statistics().constructions_failed, 0);
        let solution = outcome.result().solution().expect("a feasible solution");
        assert!(solution.is_consistent_with(&problem));
    }

    #[test]
    fn test_zero_iterations_is_unknown() {
        let problem = scenario();
        let config = GraspConfig::new().with_max_iterations(0);
        let outcome = run(&problem, SpatialEligibility::Zone, config);
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.statistics().oracle_calls, 0);
    }

    #[test]
    fn test_crane_load_oracle_finds_balanced_split() {
        // Loads ignore ordering and interference: the best split of
        // 8 + 10 + 20 + 5 + 30 over two cranes is 38 / 35.
        let problem = scenario();
        let search = QcScheduling::new(
            &problem,
            ExpansionPolicy::new(SpatialEligibility::Unrestricted),
        );
        let config = GraspConfig::new()
            .with_alpha(0.0)
            .with_seed(1)
            .with_max_iterations(300);
        let outcome: GraspOutcome<i64> = GraspSolver::with_config(config).solve(
            &search,
            &mut CraneLoadOracle::new(),
            NoOperationMonitor,
        );

        assert_eq!(outcome.result().objective_value(), Some(38));
    }
}
