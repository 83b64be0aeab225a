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

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GraspStatistics {
    /// Completed or skipped GRASP iterations.
    pub iterations: u64,
    /// Constructions that got stuck before assigning every task.
    pub constructions_failed: u64,
    /// Swap neighbours evaluated by the oracle.
    pub moves_evaluated: u64,
    /// Swaps that were accepted.
    pub moves_accepted: u64,
    /// Swap neighbours skipped because the run had already visited them.
    pub memo_hits: u64,
    /// Oracle invocations.
    pub oracle_calls: u64,
    /// Improvements of the incumbent.
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl GraspStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_construction_failed(&mut self) {
        self.constructions_failed = self.constructions_failed.saturating_add(1);
    }

    #[inline]
    pub fn on_move_evaluated(&mut self) {
        self.moves_evaluated = self.moves_evaluated.saturating_add(1);
    }

    #[inline]
    pub fn on_move_accepted(&mut self) {
        self.moves_accepted = self.moves_accepted.saturating_add(1);
    }

    #[inline]
    pub fn on_memo_hit(&mut self) {
        self.memo_hits = self.memo_hits.saturating_add(1);
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
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn moves_rejected(&self) -> u64 {
        self.moves_evaluated.saturating_sub(self.moves_accepted)
    }
}

impl std::fmt::Display for GraspStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "QCS-GRASP Statistics:")?;
        writeln!(f, "   Iterations:           {}", self.iterations)?;
        writeln!(f, "   Failed constructions: {}", self.constructions_failed)?;
        writeln!(f, "   Moves evaluated:      {}", self.moves_evaluated)?;
        writeln!(f, "   Moves accepted:       {}", self.moves_accepted)?;
        writeln!(f, "   Moves rejected:       {}", self.moves_rejected())?;
        writeln!(f, "   Memo hits:            {}", self.memo_hits)?;
        writeln!(f, "   Oracle calls:         {}", self.oracle_calls)?;
        writeln!(f, "   Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "   Total time:           {:?}", self.time_total)?;
        Ok(())
    }
}
