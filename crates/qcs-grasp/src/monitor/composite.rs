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

//! Fan-out monitor. `search_command` returns the first `Terminate` of its
//! children in insertion order; every other event reaches all of them.

use crate::{monitor::grasp_monitor::GraspMonitor, stats::GraspStatistics};
use qcs_model::{problem::Problem, solution::Solution};
use qcs_search::monitor::SearchCommand;

pub struct CompositeGraspMonitor<'a, T> {
    monitors: Vec<Box<dyn GraspMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeGraspMonitor<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeGraspMonitor<'a, T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: GraspMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn GraspMonitor<T> + 'a>) {
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

impl<'a, T> FromIterator<Box<dyn GraspMonitor<T> + 'a>> for CompositeGraspMonitor<'a, T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn GraspMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> GraspMonitor<T> for CompositeGraspMonitor<'a, T> {
    fn name(&self) -> &str {
        "CompositeGraspMonitor"
    }

    fn on_start(&mut self, problem: &Problem<T>, statistics: &GraspStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_start(problem, statistics);
        }
    }

    fn on_end(&mut self, statistics: &GraspStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_end(statistics);
        }
    }

    fn on_iteration(&mut self, statistics: &GraspStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_iteration(statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &GraspStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    fn search_command(&mut self, statistics: &GraspStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(statistics);
            if command != SearchCommand::Continue {
                return command;
            }
        }
        SearchCommand::Continue
    }
}
