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

//! Fan-out monitor.
//!
//! Events are dispatched to child monitors in insertion order.
//! `search_command` short-circuits on the first `Terminate`, so put stricter
//! stop conditions first. Other callbacks always reach every child.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    stats::BnbSolverStatistics,
};
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::{monitor::SearchCommand, state::AssignmentState};

/// A tree search monitor that forwards every event to a list of monitors.
pub struct CompositeTreeSearchMonitor<'a, T, C> {
    monitors: Vec<Box<dyn TreeSearchMonitor<T, C> + 'a>>,
}

impl<'a, T, C> Default for CompositeTreeSearchMonitor<'a, T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, C> CompositeTreeSearchMonitor<'a, T, C> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T, C> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T, C> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T, C> FromIterator<Box<dyn TreeSearchMonitor<T, C> + 'a>>
    for CompositeTreeSearchMonitor<'a, T, C>
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T, C> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T, C> TreeSearchMonitor<T, C> for CompositeTreeSearchMonitor<'a, T, C> {
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, problem: &Problem<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(problem, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(&mut self, statistics: &BnbSolverStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(statistics);
            if !matches!(command, SearchCommand::Continue) {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, state: &AssignmentState<T, C>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(state, statistics);
        }
    }

    fn on_prune(
        &mut self,
        state: &AssignmentState<T, C>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(state, reason, statistics);
        }
    }

    fn on_successors_enqueued(
        &mut self,
        state: &AssignmentState<T, C>,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_successors_enqueued(state, count, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcs_search::oracle::CraneLoads;
    use std::{cell::RefCell, rc::Rc};

    type C = CraneLoads<i64>;

    struct Scripted {
        name: &'static str,
        command: SearchCommand,
        polls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl TreeSearchMonitor<i64, C> for Scripted {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter_search(&mut self, _: &Problem<i64>, _: &BnbSolverStatistics) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}
        fn search_command(&mut self, _: &BnbSolverStatistics) -> SearchCommand {
            self.polls.borrow_mut().push(self.name);
            self.command.clone()
        }
        fn on_step(&mut self, _: &AssignmentState<i64, C>, _: &BnbSolverStatistics) {}
        fn on_prune(&mut self, _: &AssignmentState<i64, C>, _: PruneReason, _: &BnbSolverStatistics) {}
        fn on_successors_enqueued(
            &mut self,
            _: &AssignmentState<i64, C>,
            _: usize,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_solution_found(&mut self, _: &Solution<i64>, _: &BnbSolverStatistics) {}
    }

    #[test]
    fn test_first_terminate_wins() {
        let polls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeTreeSearchMonitor::<i64, C>::new();
        for (name, command) in [
            ("a", SearchCommand::Continue),
            ("b", SearchCommand::Terminate("stop b".to_string())),
            ("c", SearchCommand::Terminate("stop c".to_string())),
        ] {
            composite.add_monitor(Scripted {
                name,
                command,
                polls: Rc::clone(&polls),
            });
        }

        assert_eq!(composite.len(), 3);
        assert_eq!(
            composite.search_command(&BnbSolverStatistics::default()),
            SearchCommand::Terminate("stop b".to_string())
        );
        assert_eq!(*polls.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<i64, C>::default();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
