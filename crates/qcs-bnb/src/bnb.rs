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

//! Best-first branch-and-bound over assignment states.
//!
//! Every iteration pops the most promising open node, asks the oracle for
//! the exact objective of its (partial) assignment and either records it as
//! the new incumbent, prunes it, or expands it:
//!
//! 1. A node whose lower bound already reaches the incumbent is dropped
//!    without an oracle call. Bounds are checked again on pop because the
//!    incumbent may have improved since the node was pushed.
//! 2. The oracle receives a copy of the node's constraint set tightened to
//!    the incumbent. An infeasible answer, or an objective that does not
//!    beat the incumbent, marks the assignment explored and drops it.
//! 3. A goal state that survives becomes the incumbent. Goals are never
//!    expanded.
//! 4. Any other node is marked explored and expanded. Successors whose
//!    assignment was already explored are skipped, the dominance rule thins
//!    the rest, and each survivor is bounded and either dropped or pushed.
//!
//! The search ends when the fringe runs dry, when the iteration budget is
//! used up, or when a monitor asks to terminate. The last two return the
//! best incumbent so far, if any. Oracle objectives of partial assignments
//! never exceed those of their completions and bounds are admissible, so an
//! exhausted fringe proves the incumbent optimal over the expanded tree.

use crate::{
    config::BnbConfig,
    fringe::{Fringe, FringeEntry},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stats::BnbSolverStatistics,
    tree::{NodeIndex, SearchTree},
};
use qcs_core::num::SolverNumeric;
use qcs_model::solution::Solution;
use qcs_search::{
    bound::DominanceRule,
    monitor::SearchCommand,
    oracle::{ConstraintSet, Oracle, OracleSolution},
    result::TerminationReason,
    search_problem::SearchProblem,
    state::{Assignment, AssignmentState},
};
use rustc_hash::FxHashSet;

/// The branch-and-bound execution engine. Expansion and bounding come from a
/// `SearchProblem`, exact evaluation from an `Oracle`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    config: BnbConfig,
}

impl BnbSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: BnbConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    /// Runs the search to completion or until the budget or a monitor stops
    /// it.
    #[tracing::instrument(
        level = "debug",
        name = "bnb",
        skip_all,
        fields(strategy = %self.config.strategy(), oracle = oracle.name(), dominance = dominance.name())
    )]
    pub fn solve<T, P, O, D, M>(
        &self,
        search: &P,
        oracle: &mut O,
        dominance: &mut D,
        mut monitor: M,
    ) -> BnbSolverOutcome<T>
    where
        T: SolverNumeric,
        O: Oracle<T>,
        P: SearchProblem<T, O::Constraints>,
        D: DominanceRule<T, O::Constraints>,
        M: TreeSearchMonitor<T, O::Constraints>,
    {
        BnbSolverSearchSession::new(&self.config, search, oracle, dominance, &mut monitor).run()
    }
}

/// State of a single search run.
struct BnbSolverSearchSession<'a, T, P, O, D, M>
where
    O: Oracle<T>,
{
    config: &'a BnbConfig,
    search: &'a P,
    oracle: &'a mut O,
    dominance: &'a mut D,
    monitor: &'a mut M,
    fringe: Fringe<T, O::Constraints>,
    tree: SearchTree,
    /// Every assignment processed or expanded so far. Like `tree`, it only
    /// grows during a run.
    explored: FxHashSet<Assignment>,
    next_sequence: u64,
    best_objective: Option<T>,
    best_solution: Option<Solution<T>>,
    best_node: Option<NodeIndex>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, P, O, D, M> BnbSolverSearchSession<'a, T, P, O, D, M>
where
    T: SolverNumeric,
    O: Oracle<T>,
    P: SearchProblem<T, O::Constraints>,
    D: DominanceRule<T, O::Constraints>,
    M: TreeSearchMonitor<T, O::Constraints>,
{
    fn new(
        config: &'a BnbConfig,
        search: &'a P,
        oracle: &'a mut O,
        dominance: &'a mut D,
        monitor: &'a mut M,
    ) -> Self {
        Self {
            config,
            search,
            oracle,
            dominance,
            monitor,
            fringe: Fringe::new(config.strategy()),
            tree: SearchTree::with_capacity(search.problem().num_tasks() + 1),
            explored: FxHashSet::default(),
            next_sequence: 0,
            best_objective: None,
            best_solution: None,
            best_node: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor
            .on_enter_search(self.search.problem(), &self.stats);
        self.initialize();

        let termination_reason = loop {
            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&self.stats) {
                break TerminationReason::Aborted(msg);
            }

            if let Some(limit) = self.config.iteration_limit()
                && self.stats.iterations >= limit
            {
                break TerminationReason::IterationLimitReached;
            }

            let Some(entry) = self.fringe.pop() else {
                break if self.best_solution.is_some() {
                    TerminationReason::OptimalityProven
                } else {
                    TerminationReason::InfeasibilityProven
                };
            };

            self.stats.on_iteration();
            self.monitor.on_step(&entry.state, &self.stats);
            self.process(entry);
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        let decisions = self
            .best_node
            .map(|node| self.tree.path_to(node))
            .unwrap_or_default();

        match reason {
            TerminationReason::OptimalityProven | TerminationReason::InfeasibilityProven => {
                match self.best_solution {
                    Some(solution) => BnbSolverOutcome::optimal(solution, decisions, self.stats),
                    None => BnbSolverOutcome::infeasible(self.stats),
                }
            }
            TerminationReason::IterationLimitReached => {
                BnbSolverOutcome::iteration_limit(self.best_solution, decisions, self.stats)
            }
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.best_solution, decisions, msg, self.stats)
            }
        }
    }

    /// Pushes the root node.
    fn initialize(&mut self) {
        let root = self.search.start_state();
        let bound = self.search.lower_bound(&root);
        let node = self.tree.push_root();
        self.push(bound, 0, node, root);
    }

    #[inline]
    fn push(
        &mut self,
        bound: T,
        depth: usize,
        node: NodeIndex,
        state: AssignmentState<T, O::Constraints>,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.fringe.push(FringeEntry {
            bound,
            depth,
            sequence,
            node,
            state,
        });
        self.stats.on_fringe_size(self.fringe.len());
    }

    #[inline]
    fn reaches_incumbent(&self, value: T) -> bool {
        self.best_objective.is_some_and(|best| value >= best)
    }

    fn prune(&mut self, state: &AssignmentState<T, O::Constraints>, reason: PruneReason) {
        match reason {
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::Incumbent => self.stats.on_pruning_incumbent(),
            PruneReason::Explored => self.stats.on_duplicate(),
        }
        tracing::trace!(assigned = state.num_assigned(), %reason, "pruned");
        self.monitor.on_prune(state, reason, &self.stats);
    }

    fn process(&mut self, entry: FringeEntry<T, O::Constraints>) {
        if self.reaches_incumbent(entry.bound) {
            self.prune(&entry.state, PruneReason::BoundDominated);
            return;
        }
        if self.explored.contains(entry.state.assignment()) {
            self.prune(&entry.state, PruneReason::Explored);
            return;
        }

        let mut constraints = entry.state.constraints().clone();
        if let Some(best) = self.best_objective {
            constraints.tighten_upper_bound(best);
        }
        self.stats.on_oracle_call();
        let status = self.oracle.solve(self.search.problem(), &constraints);

        let Some(schedule) = status.into_solution() else {
            self.explored.insert(entry.state.assignment().clone());
            self.prune(&entry.state, PruneReason::Infeasible);
            return;
        };
        if self.reaches_incumbent(schedule.objective()) {
            self.explored.insert(entry.state.assignment().clone());
            self.prune(&entry.state, PruneReason::Incumbent);
            return;
        }

        self.explored.insert(entry.state.assignment().clone());
        if self.search.is_goal(&entry.state) {
            self.handle_complete_solution(&entry, &schedule);
        } else {
            self.expand(&entry);
        }
    }

    fn handle_complete_solution(
        &mut self,
        entry: &FringeEntry<T, O::Constraints>,
        schedule: &OracleSolution<T>,
    ) {
        let solution = entry.state.to_solution(self.search.problem(), schedule);
        let objective = schedule.objective();

        self.best_objective = Some(objective);
        self.best_node = Some(entry.node);
        self.stats.on_solution_found();
        tracing::debug!(
            %objective,
            iteration = self.stats.iterations,
            fringe = self.fringe.len(),
            "new incumbent"
        );
        self.monitor.on_solution_found(&solution, &self.stats);
        self.best_solution = Some(solution);
    }

    fn expand(&mut self, entry: &FringeEntry<T, O::Constraints>) {
        self.stats.on_node_expanded();

        let mut successors = self.search.expand(&entry.state);
        let before = successors.len();
        successors.retain(|successor| !self.explored.contains(successor.state.assignment()));
        for _ in successors.len()..before {
            self.stats.on_duplicate();
        }

        let dominated = self.dominance.retain_non_dominated(&mut successors);
        self.stats.on_pruning_dominance(dominated);

        let depth = entry.depth + 1;
        let mut enqueued = 0usize;
        for successor in successors {
            self.stats.on_node_generated();
            let bound = self.search.lower_bound(&successor.state);
            if self.reaches_incumbent(bound) {
                self.explored.insert(successor.state.assignment().clone());
                self.prune(&successor.state, PruneReason::BoundDominated);
                continue;
            }

            let node = self
                .tree
                .push_child(entry.node, successor.action, successor.cost);
            self.stats.on_depth_update(depth as u64);
            self.push(bound, depth, node, successor.state);
            enqueued += 1;
        }

        self.monitor
            .on_successors_enqueued(&entry.state, enqueued, &self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::FringeStrategy,
        monitor::{no_op::NoOperationMonitor, time_limit::TimeLimitMonitor},
    };
    use qcs_model::{
        index::{CraneIndex, TaskIndex},
        problem::{Problem, ProblemBuilder},
    };
    use qcs_oracle::{constraints::SequencingConstraints, disjunctive::DisjunctiveOracle};
    use qcs_search::{
        bound::{NoDominance, ParetoDominance},
        expansion::{ExpansionPolicy, SpatialEligibility},
        oracle::{CraneLoads, OracleStatus},
        result::SolverResult,
        search_problem::QcScheduling,
    };
    use std::time::Duration;

    fn t(i: usize) -> TaskIndex {
        TaskIndex::new(i)
    }

    fn c(i: usize) -> CraneIndex {
        CraneIndex::new(i)
    }

    fn build(
        durations: &[i64],
        locations: &[i64],
        cranes: &[i64],
        non_simultaneous: &[(usize, usize)],
        precedence: &[(usize, usize)],
    ) -> Problem<i64> {
        let mut builder = ProblemBuilder::<i64>::new(durations.len(), cranes.len());
        for (i, (&p, &l)) in durations.iter().zip(locations).enumerate() {
            builder.set_task_duration(t(i), p).set_task_location(t(i), l);
        }
        for (k, &l) in cranes.iter().enumerate() {
            builder.set_crane_location(c(k), l);
        }
        for &(a, b) in non_simultaneous {
            builder.add_non_simultaneous(t(a), t(b));
        }
        for &(a, b) in precedence {
            builder.add_precedence(t(a), t(b));
        }
        builder.build()
    }

    fn scenario() -> Problem<i64> {
        build(
            &[8, 10, 20, 5, 30],
            &[1, 2, 3, 5, 6],
            &[1, 4],
            &[(0, 1), (1, 2), (2, 3), (3, 4)],
            &[],
        )
    }

    fn solve(
        problem: &Problem<i64>,
        eligibility: SpatialEligibility,
        config: BnbConfig,
    ) -> BnbSolverOutcome<i64> {
        let search = QcScheduling::new(problem, ExpansionPolicy::new(eligibility));
        BnbSolver::with_config(config).solve(
            &search,
            &mut DisjunctiveOracle::new(),
            &mut ParetoDominance,
            NoOperationMonitor,
        )
    }

    /// Enumerates every split of the tasks over the cranes in every order.
    fn brute_force(problem: &Problem<i64>) -> i64 {
        fn permutations(items: &mut Vec<usize>, k: usize, out: &mut Vec<Vec<usize>>) {
            if k == items.len() {
                out.push(items.clone());
                return;
            }
            for i in k..items.len() {
                items.swap(k, i);
                permutations(items, k + 1, out);
                items.swap(k, i);
            }
        }

        let n = problem.num_tasks();
        let k = problem.num_cranes();
        let mut orders = Vec::new();
        permutations(&mut (0..n).collect(), 0, &mut orders);

        let mut best = i64::MAX;
        let mut oracle = DisjunctiveOracle::new();
        for order in &orders {
            for code in 0..k.pow(n as u32) {
                let mut sequences = vec![Vec::new(); k];
                let mut rest = code;
                let mut cranes = vec![0; n];
                for crane in cranes.iter_mut() {
                    *crane = rest % k;
                    rest /= k;
                }
                for &task in order {
                    sequences[cranes[task]].push(t(task));
                }
                let state = AssignmentState::<i64, SequencingConstraints<i64>>::from_sequences(
                    problem, &sequences,
                )
                .expect("valid sequences");
                if let Some(objective) = oracle.solve(problem, state.constraints()).objective() {
                    best = best.min(objective);
                }
            }
        }
        best
    }

    #[test]
    fn test_matches_brute_force_without_zones() {
        let instances = [
            build(&[3, 5, 2, 4], &[1, 2, 3, 4], &[1, 4], &[(0, 1), (1, 2), (2, 3)], &[]),
            build(&[6, 1, 4, 4], &[1, 1, 2, 5], &[2, 2], &[(0, 3), (1, 2)], &[]),
            build(&[2, 7, 3, 5, 1], &[1, 3, 3, 4, 6], &[1, 6], &[(0, 1), (2, 3), (3, 4)], &[]),
        ];

        for problem in &instances {
            let outcome = solve(problem, SpatialEligibility::Unrestricted, BnbConfig::new());
            let solution = outcome.result().solution().expect("a solution");
            assert!(outcome.result().is_optimal());
            assert_eq!(solution.objective_value(), brute_force(problem));
            assert!(solution.is_consistent_with(problem));
        }
    }

    #[test]
    fn test_dominance_does_not_change_optimum() {
        let problem = scenario();
        let search = QcScheduling::new(&problem, ExpansionPolicy::default());
        let solver = BnbSolver::new();

        let with: BnbSolverOutcome<i64> = solver.solve(
            &search,
            &mut DisjunctiveOracle::new(),
            &mut ParetoDominance,
            NoOperationMonitor,
        );
        let without: BnbSolverOutcome<i64> = solver.solve(
            &search,
            &mut DisjunctiveOracle::new(),
            &mut NoDominance,
            NoOperationMonitor,
        );

        assert_eq!(
            with.result().objective_value(),
            without.result().objective_value()
        );
        assert!(with.result().objective_value().is_some());
    }

    #[test]
    fn test_scenario_is_solved_within_bounds() {
        let problem = scenario();
        let outcome = solve(&problem, SpatialEligibility::Zone, BnbConfig::new());

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        let solution = outcome.result().solution().expect("a solution");
        // c0 = [0, 1, 2], c1 = [4, 3] reaches 43 under the zone rule.
        assert!((37..=43).contains(&solution.objective_value()));
        assert!(solution.is_consistent_with(&problem));

        // the recorded decisions replay to the reported sequences
        assert_eq!(outcome.decisions().len(), problem.num_tasks());
        let mut state = AssignmentState::<i64, CraneLoads<i64>>::start(&problem);
        for &action in outcome.decisions() {
            state = state.apply_action(&problem, action).expect("valid action");
        }
        assert_eq!(state.assignment().sequences(), solution.sequences());

        let stats = outcome.statistics();
        assert!(stats.solutions_found >= 1);
        assert!(stats.oracle_calls <= stats.iterations);
        assert_eq!(stats.max_depth, problem.num_tasks() as u64);
    }

    #[test]
    fn test_depth_first_reaches_same_optimum() {
        let problem = scenario();
        let best_first = solve(&problem, SpatialEligibility::Zone, BnbConfig::new());
        let depth_first = solve(
            &problem,
            SpatialEligibility::Zone,
            BnbConfig::new().with_strategy(FringeStrategy::DepthFirst),
        );

        assert!(depth_first.result().is_optimal());
        assert_eq!(
            best_first.result().objective_value(),
            depth_first.result().objective_value()
        );
    }

    #[test]
    fn test_precedence_instance_is_solved() {
        let problem = build(
            &[4, 8, 10, 5, 6, 7],
            &[1, 1, 2, 3, 3, 4],
            &[1, 4],
            &[],
            &[(0, 1)],
        );
        let outcome = solve(&problem, SpatialEligibility::Zone, BnbConfig::new());

        let solution = outcome.result().solution().expect("a solution");
        assert!(solution.objective_value() >= 20);
        assert!(solution.is_consistent_with(&problem));
        assert!(
            solution.completion_time(t(0)) + problem.task_duration(t(1))
                <= solution.completion_time(t(1))
        );
    }

    #[test]
    fn test_zero_time_limit_aborts_without_solution() {
        let problem = scenario();
        let search = QcScheduling::new(&problem, ExpansionPolicy::default());
        let outcome: BnbSolverOutcome<i64> = BnbSolver::new().solve(
            &search,
            &mut DisjunctiveOracle::new(),
            &mut ParetoDominance,
            TimeLimitMonitor::new(Duration::ZERO, 1),
        );

        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.statistics().iterations, 0);
    }

    #[test]
    fn test_iteration_limit_stops_search() {
        let problem = scenario();
        let outcome = solve(
            &problem,
            SpatialEligibility::Zone,
            BnbConfig::new().with_iteration_limit(1),
        );

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::IterationLimitReached
        );
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.statistics().iterations, 1);
        assert_eq!(outcome.statistics().nodes_expanded, 1);
    }

    /// Rejects every constraint set.
    struct RejectingOracle;

    impl Oracle<i64> for RejectingOracle {
        type Constraints = CraneLoads<i64>;

        fn name(&self) -> &str {
            "RejectingOracle"
        }

        fn solve(&mut self, _: &Problem<i64>, _: &CraneLoads<i64>) -> OracleStatus<i64> {
            OracleStatus::Infeasible
        }
    }

    #[test]
    fn test_rejecting_oracle_proves_infeasibility() {
        let problem = scenario();
        let search = QcScheduling::new(&problem, ExpansionPolicy::default());
        let outcome: BnbSolverOutcome<i64> = BnbSolver::new().solve(
            &search,
            &mut RejectingOracle,
            &mut NoDominance,
            NoOperationMonitor,
        );

        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert_eq!(outcome.statistics().oracle_calls, 1);
        assert_eq!(outcome.statistics().prunings_infeasible, 1);
        assert!(outcome.decisions().is_empty());
    }

    #[test]
    fn test_load_oracle_finds_balanced_split() {
        // Without pair constraints the makespan is the largest crane load.
        let problem = build(&[4, 3, 3, 2], &[0, 0, 0, 0], &[0, 0], &[], &[]);
        let search = QcScheduling::new(&problem, ExpansionPolicy::default());
        let outcome: BnbSolverOutcome<i64> = BnbSolver::new().solve(
            &search,
            &mut qcs_search::oracle::CraneLoadOracle::new(),
            &mut ParetoDominance,
            NoOperationMonitor,
        );

        assert_eq!(outcome.result().objective_value(), Some(6));
        assert_eq!(outcome.decisions().len(), 4);
    }
}
