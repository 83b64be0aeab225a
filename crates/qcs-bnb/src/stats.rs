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

use std::time::Duration;

/// Statistics collected during the execution of the QCS-BnB solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Nodes popped from the fringe.
    pub iterations: u64,
    /// Nodes that were expanded into successors.
    pub nodes_expanded: u64,
    /// Successors that survived the explored memo and dominance and were bounded.
    pub nodes_generated: u64,
    /// The deepest level pushed onto the fringe.
    pub max_depth: u64,
    /// Pruned because the lower bound reached the incumbent.
    pub prunings_bound: u64,
    /// Pruned because the oracle reported infeasibility.
    pub prunings_infeasible: u64,
    /// Pruned because the oracle objective did not beat the incumbent.
    pub prunings_incumbent: u64,
    /// Successors removed by the dominance rule.
    pub prunings_dominance: u64,
    /// Nodes and successors skipped because their assignment was explored.
    pub duplicates: u64,
    /// Oracle invocations.
    pub oracle_calls: u64,
    /// Improving goal states found.
    pub solutions_found: u64,
    /// Largest fringe size observed.
    pub peak_fringe: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add(1);
    }

    #[inline]
    pub fn on_node_generated(&mut self) {
        self.nodes_generated = self.nodes_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_incumbent(&mut self) {
        self.prunings_incumbent = self.prunings_incumbent.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_dominance(&mut self, count: usize) {
        self.prunings_dominance = self.prunings_dominance.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_duplicate(&mut self) {
        self.duplicates = self.duplicates.saturating_add(1);
    }

    #[inline]
    pub fn on_oracle_call(&mut self) {
        self.oracle_calls = self.oracle_calls.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_fringe_size(&mut self, size: usize) {
        self.peak_fringe = self.peak_fringe.max(size as u64);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "QCS-BnB Solver Statistics:")?;
        writeln!(f, "  Iterations:           {}", self.iterations)?;
        writeln!(f, "  Nodes expanded:       {}", self.nodes_expanded)?;
        writeln!(f, "  Nodes generated:      {}", self.nodes_generated)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Peak fringe size:     {}", self.peak_fringe)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (incumbent): {}", self.prunings_incumbent)?;
        writeln!(f, "  Prunings (dominance): {}", self.prunings_dominance)?;
        writeln!(f, "  Duplicates skipped:   {}", self.duplicates)?;
        writeln!(f, "  Oracle calls:         {}", self.oracle_calls)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
